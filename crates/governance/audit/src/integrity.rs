//! Integrity verification for audit chains

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::entry::AuditLogEntry;

/// Render a JSON value with object keys sorted at every level.
///
/// Independent of whether `serde_json` preserves insertion order, so hashes
/// stay stable across builds and across a round trip through the log file.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// SHA-256 (hex) over every field of `entry` except `hash`.
pub fn compute_hash(entry: &AuditLogEntry) -> String {
    let mut value = serde_json::to_value(entry).unwrap_or_default();
    if let Value::Object(map) = &mut value {
        map.remove("hash");
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical_json(&value).as_bytes());
    hex::encode(hasher.finalize())
}

/// Result of replaying a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainVerification {
    /// Whether the chain is valid
    pub valid: bool,

    /// Total number of entries checked
    pub total_entries: usize,

    /// Number of entries verified before the first failure
    pub verified_entries: usize,

    /// Index of first invalid entry (if any)
    pub first_invalid_index: Option<usize>,

    /// Error message (if any)
    pub error_message: Option<String>,
}

/// Replay `entries` from the start.
///
/// Each entry's `previous_hash` must equal the prior entry's stored hash
/// (`None` for the first), and each stored hash must match a recomputation.
/// Stops at the first mismatch.
pub fn verify_entries(entries: &[AuditLogEntry]) -> ChainVerification {
    let mut result = ChainVerification {
        valid: true,
        total_entries: entries.len(),
        verified_entries: 0,
        first_invalid_index: None,
        error_message: None,
    };

    let mut previous: Option<&str> = None;
    for (i, entry) in entries.iter().enumerate() {
        if entry.previous_hash.as_deref() != previous {
            result.valid = false;
            result.first_invalid_index = Some(i);
            result.error_message = Some(format!(
                "Entry {} has broken chain link (expected prev: {:?}, got: {:?})",
                entry.audit_id, previous, entry.previous_hash
            ));
            return result;
        }

        if compute_hash(entry) != entry.hash {
            result.valid = false;
            result.first_invalid_index = Some(i);
            result.error_message = Some(format!("Entry {} has invalid hash", entry.audit_id));
            return result;
        }

        previous = Some(entry.hash.as_str());
        result.verified_entries = i + 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditOutcome;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn entry(previous_hash: Option<String>, allowed: bool) -> AuditLogEntry {
        let mut entry = AuditLogEntry {
            audit_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            context: json!({"authority_level": "advisory"}),
            action: json!({"type": "respond"}),
            result: AuditOutcome {
                allowed,
                violations: if allowed { vec![] } else { vec!["AIT-1".into()] },
                warnings: vec![],
                remediation: None,
                latency_us: 4.5,
            },
            metadata: serde_json::Map::new(),
            previous_hash,
            hash: String::new(),
        };
        entry.hash = compute_hash(&entry);
        entry
    }

    fn chain(n: usize) -> Vec<AuditLogEntry> {
        let mut entries: Vec<AuditLogEntry> = Vec::new();
        for i in 0..n {
            let prev = entries.last().map(|e| e.hash.clone());
            entries.push(entry(prev, i % 2 == 0));
        }
        entries
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"d": [true, null], "c": "x\"y"}});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":{"c":"x\"y","d":[true,null]},"b":1}"#
        );
    }

    #[test]
    fn hash_excludes_hash_field() {
        let mut e = entry(None, true);
        let original = compute_hash(&e);
        e.hash = "something else".into();
        assert_eq!(compute_hash(&e), original);
    }

    #[test]
    fn valid_chain_verifies() {
        let entries = chain(4);
        let result = verify_entries(&entries);
        assert!(result.valid);
        assert_eq!(result.total_entries, 4);
        assert_eq!(result.verified_entries, 4);
    }

    #[test]
    fn empty_chain_is_valid() {
        assert!(verify_entries(&[]).valid);
    }

    #[test]
    fn flipped_field_breaks_chain() {
        let mut entries = chain(3);
        entries[1].result.allowed = !entries[1].result.allowed;
        let result = verify_entries(&entries);
        assert!(!result.valid);
        assert_eq!(result.first_invalid_index, Some(1));
        assert_eq!(result.verified_entries, 1);
    }

    #[test]
    fn broken_link_detected() {
        let mut entries = chain(3);
        entries.remove(1);
        let result = verify_entries(&entries);
        assert!(!result.valid);
        assert_eq!(result.first_invalid_index, Some(1));
        assert!(result.error_message.unwrap().contains("broken chain link"));
    }

    #[test]
    fn hash_survives_file_round_trip() {
        let e = entry(None, false);
        let line = serde_json::to_string(&e).unwrap();
        let restored: AuditLogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(compute_hash(&restored), e.hash);
    }
}
