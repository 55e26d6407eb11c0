use serde::{Deserialize, Serialize};
use std::fmt;

/// Authority held by an acting system, or required by an action.
///
/// Ordered: `None < Advisory < Binding < Autonomous`. AIT-1 holds iff the
/// granted level is at least the required level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    /// No authority, lowest rank
    #[default]
    None = 0,
    /// May recommend, never bind
    Advisory = 1,
    /// May make binding decisions
    Binding = 2,
    /// May act without oversight, highest rank
    Autonomous = 3,
}

impl AuthorityLevel {
    pub const ALL: [AuthorityLevel; 4] = [
        AuthorityLevel::None,
        AuthorityLevel::Advisory,
        AuthorityLevel::Binding,
        AuthorityLevel::Autonomous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityLevel::None => "none",
            AuthorityLevel::Advisory => "advisory",
            AuthorityLevel::Binding => "binding",
            AuthorityLevel::Autonomous => "autonomous",
        }
    }

    /// Numeric rank used for ordering comparisons.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Parse a raw authority label. Never fails.
    ///
    /// Exact level names match case-insensitively. A label that starts with a
    /// level name followed by `_` maps to that level, so an action
    /// classification such as `binding_decision` requires `Binding`.
    /// Anything else is `None`.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        for level in Self::ALL {
            let name = level.as_str();
            if lowered == name {
                return level;
            }
            if let Some(rest) = lowered.strip_prefix(name) {
                if rest.starts_with('_') {
                    return level;
                }
            }
        }
        AuthorityLevel::None
    }

    /// Parse an optional label, defaulting to `None` when absent.
    pub fn parse_or_none(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
