use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::remediation::Remediation;

/// Outcome of one `verify` call. Immutable once returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the action may proceed
    pub allowed: bool,
    /// Blocking invariant violations, in invariant-set order. Empty iff allowed.
    pub violations: Vec<String>,
    /// Non-blocking violations (non-strict mode only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Suggested remediation when blocked
    pub remediation: Option<Remediation>,
    /// Audit trail identifier, when auditing is enabled
    pub audit_id: Option<Uuid>,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
    /// Verification latency in microseconds
    pub latency_us: f64,
}

impl VerificationResult {
    pub fn is_blocked(&self) -> bool {
        !self.allowed
    }

    /// Whether the named invariant is among the blocking violations.
    pub fn violated(&self, name: &str) -> bool {
        self.violations.iter().any(|v| v == name)
    }
}

/// Fixed remediation carried by every conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictRemediation {
    HumanDecisionRequired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPriority {
    High,
}

/// Raised when every candidate action violates at least one invariant.
///
/// The kernel never picks a least-bad candidate; the conflict is surfaced
/// so a human decides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantConflict {
    /// Always `invariant_conflict`
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Union of violated invariant names, first-seen order
    pub conflicting_invariants: Vec<String>,
    /// Union of violated hard constraints, first-seen order
    pub conflicting_constraints: Vec<String>,
    /// Number of candidates evaluated
    pub attempted_actions: usize,
    pub remediation: ConflictRemediation,
    pub escalation_priority: EscalationPriority,
}

impl InvariantConflict {
    pub const KIND: &'static str = "invariant_conflict";
    pub const MESSAGE: &'static str = "No valid action exists - invariants in conflict";

    pub fn new(
        conflicting_invariants: Vec<String>,
        conflicting_constraints: Vec<String>,
        attempted_actions: usize,
    ) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            message: Self::MESSAGE.to_string(),
            conflicting_invariants,
            conflicting_constraints,
            attempted_actions,
            remediation: ConflictRemediation::HumanDecisionRequired,
            escalation_priority: EscalationPriority::High,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allowed,
    Blocked,
}

/// Why one invariant was violated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationDetail {
    pub invariant: String,
    pub description: String,
    pub why_violated: String,
}

/// Structured explanation of a verification decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub decision: Decision,
    pub violations: Vec<String>,
    pub latency_us: f64,
    /// Present only when blocked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ViolationDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}
