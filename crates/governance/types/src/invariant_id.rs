use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a built-in invariant.
///
/// The set is closed. Custom invariants are identified by their own name
/// string and never map onto one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvariantId {
    #[serde(rename = "AIT-1")]
    Ait1,
    #[serde(rename = "BG-1")]
    Bg1,
    #[serde(rename = "GI-1")]
    Gi1,
    #[serde(rename = "MAP-1")]
    Map1,
    #[serde(rename = "CMP-1")]
    Cmp1,
    #[serde(rename = "EXP-1")]
    Exp1,
}

impl InvariantId {
    /// Default evaluation order of the built-in battery.
    pub const ALL: [InvariantId; 6] = [
        InvariantId::Ait1,
        InvariantId::Bg1,
        InvariantId::Gi1,
        InvariantId::Map1,
        InvariantId::Cmp1,
        InvariantId::Exp1,
    ];

    /// Remediation priority, most severe first.
    ///
    /// Binding authority > hard constraints > consequence tracing >
    /// authority mismatch > affected-party authority > interpretation.
    pub const PRIORITY: [InvariantId; 6] = [
        InvariantId::Bg1,
        InvariantId::Gi1,
        InvariantId::Cmp1,
        InvariantId::Ait1,
        InvariantId::Exp1,
        InvariantId::Map1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvariantId::Ait1 => "AIT-1",
            InvariantId::Bg1 => "BG-1",
            InvariantId::Gi1 => "GI-1",
            InvariantId::Map1 => "MAP-1",
            InvariantId::Cmp1 => "CMP-1",
            InvariantId::Exp1 => "EXP-1",
        }
    }

    /// Look up a built-in by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == name)
    }

    /// Position in [`InvariantId::PRIORITY`]; lower is more severe.
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|id| id == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for InvariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
