//! Audit entry types

use chrono::{DateTime, Utc};
use governance_kernel_types::{Remediation, VerificationResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One recorded verification. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry ID (returned to the caller as the audit ID)
    pub audit_id: Uuid,

    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Sanitized copy of the context
    pub context: Value,

    /// Sanitized copy of the action
    pub action: Value,

    /// Decision summary
    pub result: AuditOutcome,

    /// Caller-supplied metadata
    pub metadata: Map<String, Value>,

    /// Hash of the previous entry (for chain integrity)
    pub previous_hash: Option<String>,

    /// Hash of this entry over every other field
    pub hash: String,
}

impl AuditLogEntry {
    pub fn allowed(&self) -> bool {
        self.result.allowed
    }
}

/// Decision summary stored in an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub allowed: bool,
    pub violations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub remediation: Option<Remediation>,
    pub latency_us: f64,
}

impl From<&VerificationResult> for AuditOutcome {
    fn from(result: &VerificationResult) -> Self {
        Self {
            allowed: result.allowed,
            violations: result.violations.clone(),
            warnings: result.warnings.clone(),
            remediation: result.remediation.clone(),
            latency_us: result.latency_us,
        }
    }
}
