use serde::{Deserialize, Serialize};

/// A structured, non-binding suggestion for bringing an action into compliance.
///
/// Serialized with an `action` tag, e.g.
/// `{"action": "return_to_authority", "reason": ..., ...}`.
/// Produced fresh for every blocked call; never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Remediation {
    /// Nothing to remediate
    Allow,

    /// AIT-1: hand the decision back to a sufficient authority level
    ReturnToAuthority {
        reason: String,
        required_authority_level: String,
        current_authority_level: String,
        suggested_action: String,
    },

    /// BG-1: a human must authorize the binding action
    RequireHumanAuthority {
        reason: String,
        suggested_action: String,
        binding_action_type: String,
    },

    /// GI-1: hard constraints cannot be optimized away
    RespectHardConstraints {
        reason: String,
        violated_constraints: Vec<String>,
        suggested_action: String,
    },

    /// MAP-1: interpretation needs explicit authority
    ObtainInterpretationAuthority {
        reason: String,
        suggested_action: String,
    },

    /// CMP-1: name who bears the consequences
    IdentifyConsequenceBearer {
        reason: String,
        suggested_action: String,
    },

    /// EXP-1: the affected group must hold or delegate authority
    DelegateToAffected {
        reason: String,
        affected_group: String,
        suggested_action: String,
    },

    /// Violations with no dedicated template
    Block {
        reason: String,
        suggested_action: String,
    },
}

impl Remediation {
    /// The serialized `action` tag.
    pub fn action_tag(&self) -> &'static str {
        match self {
            Remediation::Allow => "allow",
            Remediation::ReturnToAuthority { .. } => "return_to_authority",
            Remediation::RequireHumanAuthority { .. } => "require_human_authority",
            Remediation::RespectHardConstraints { .. } => "respect_hard_constraints",
            Remediation::ObtainInterpretationAuthority { .. } => {
                "obtain_interpretation_authority"
            }
            Remediation::IdentifyConsequenceBearer { .. } => "identify_consequence_bearer",
            Remediation::DelegateToAffected { .. } => "delegate_to_affected",
            Remediation::Block { .. } => "block",
        }
    }

    /// Human-readable reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Remediation::Allow => None,
            Remediation::ReturnToAuthority { reason, .. }
            | Remediation::RequireHumanAuthority { reason, .. }
            | Remediation::RespectHardConstraints { reason, .. }
            | Remediation::ObtainInterpretationAuthority { reason, .. }
            | Remediation::IdentifyConsequenceBearer { reason, .. }
            | Remediation::DelegateToAffected { reason, .. }
            | Remediation::Block { reason, .. } => Some(reason),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Remediation::Allow)
    }
}
