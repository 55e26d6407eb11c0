use serde_json::Value;

/// Replacement for sensitive values.
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 2] = ["password", "secret"];

/// Redact values whose key names contain `password` or `secret`
/// (case-insensitive), at every object nesting level.
///
/// Name-based only; values are never inspected.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| {
                    let redacted = if is_sensitive(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        sanitize(v)
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

fn is_sensitive(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|m| lowered.contains(m))
}
