use governance_kernel_types::Action;
use std::fmt;

/// How a hard-constraint name is checked against an action.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintPattern {
    /// `no_residential_hazmat`: violated when hazmat cargo passes through
    /// a residential area
    ResidentialHazmat,
    /// `time_limit_<N>`: violated when the estimated duration exceeds N minutes
    TimeLimit(f64),
    /// `time_limit_` with a suffix that is not a non-negative number.
    /// Never violated.
    Malformed(String),
    /// Anything else: violated when the action sets `violates_<name>`
    Flag(String),
}

impl ConstraintPattern {
    pub const RESIDENTIAL_HAZMAT: &'static str = "no_residential_hazmat";
    pub const TIME_LIMIT_PREFIX: &'static str = "time_limit_";

    pub fn parse(name: &str) -> Self {
        if name == Self::RESIDENTIAL_HAZMAT {
            return ConstraintPattern::ResidentialHazmat;
        }
        if let Some(suffix) = name.strip_prefix(Self::TIME_LIMIT_PREFIX) {
            return match suffix.parse::<f64>() {
                Ok(limit) if limit.is_finite() && limit >= 0.0 => {
                    ConstraintPattern::TimeLimit(limit)
                }
                _ => ConstraintPattern::Malformed(name.to_string()),
            };
        }
        ConstraintPattern::Flag(name.to_string())
    }

    /// Check a constraint name ahead of verification.
    pub fn validate(name: &str) -> Result<(), String> {
        match Self::parse(name) {
            ConstraintPattern::Malformed(_) => Err(format!(
                "constraint '{}' does not end in a non-negative number of minutes",
                name
            )),
            _ => Ok(()),
        }
    }

    /// Whether `action` violates this constraint.
    pub fn is_violated_by(&self, action: &Action) -> bool {
        match self {
            ConstraintPattern::ResidentialHazmat => {
                action.passes_through_residential && action.cargo_is_hazmat
            }
            ConstraintPattern::TimeLimit(limit) => {
                action.estimated_time_minutes.unwrap_or(0.0) > *limit
            }
            ConstraintPattern::Malformed(_) => false,
            ConstraintPattern::Flag(name) => action.flag(&format!("violates_{}", name)),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ConstraintPattern::Malformed(_))
    }
}

impl fmt::Display for ConstraintPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintPattern::ResidentialHazmat => f.write_str(Self::RESIDENTIAL_HAZMAT),
            ConstraintPattern::TimeLimit(limit) => {
                write!(f, "{}{}", Self::TIME_LIMIT_PREFIX, limit)
            }
            ConstraintPattern::Malformed(name) | ConstraintPattern::Flag(name) => {
                f.write_str(name)
            }
        }
    }
}
