use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Caller-supplied description of the environment an action is proposed in.
///
/// Well-known fields are typed; anything else lands in `extra` so arbitrary
/// records survive a round trip into the audit log. The kernel never mutates
/// a context.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Authority granted to the acting system (`none`, `advisory`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_level: Option<String>,

    /// Entity accountable for the outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence_bearer: Option<String>,

    /// Entity making the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,

    /// Constraints that may never be violated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hard_constraints: Vec<String>,

    /// Explicit evidence that a human sits in the authority chain
    #[serde(default, skip_serializing_if = "is_false")]
    pub human_in_authority_chain: bool,

    /// Human signature material; presence alone counts as evidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_signature: Option<Value>,

    /// Whether the system may collapse ambiguous meaning
    #[serde(default, skip_serializing_if = "is_false")]
    pub interpretation_authority: bool,

    /// Group affected by decisions made in this context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affects_group: Option<String>,

    /// Whether the affected group delegated authority to the decision-maker
    #[serde(default, skip_serializing_if = "is_false")]
    pub delegated_authority_from_affected: bool,

    /// Permitted action kinds (informational)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    /// Any other caller-defined fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authority_level(mut self, level: impl Into<String>) -> Self {
        self.authority_level = Some(level.into());
        self
    }

    pub fn with_consequence_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.consequence_bearer = Some(bearer.into());
        self
    }

    pub fn with_decision_maker(mut self, maker: impl Into<String>) -> Self {
        self.decision_maker = Some(maker.into());
        self
    }

    pub fn with_hard_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.hard_constraints.push(constraint.into());
        self
    }

    pub fn with_human_in_authority_chain(mut self, present: bool) -> Self {
        self.human_in_authority_chain = present;
        self
    }

    pub fn with_human_signature(mut self, signature: impl Into<Value>) -> Self {
        self.human_signature = Some(signature.into());
        self
    }

    pub fn with_interpretation_authority(mut self, granted: bool) -> Self {
        self.interpretation_authority = granted;
        self
    }

    pub fn with_affects_group(mut self, group: impl Into<String>) -> Self {
        self.affects_group = Some(group.into());
        self
    }

    pub fn with_delegation_from_affected(mut self, delegated: bool) -> Self {
        self.delegated_authority_from_affected = delegated;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Set an arbitrary extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Caller-supplied description of what is proposed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action type tag (`respond`, `execute_trade`, `select_route`, ...)
    #[serde(rename = "type", default)]
    pub action_type: String,

    /// Authority the action requires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_authority: Option<String>,

    /// Explicitly binding, regardless of type tag
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_binding: bool,

    /// Carries a commitment on behalf of someone
    #[serde(default, skip_serializing_if = "is_false")]
    pub makes_commitment: bool,

    /// Makes a consequential decision
    #[serde(default, skip_serializing_if = "is_false")]
    pub makes_decision: bool,

    /// Collapses an ambiguous meaning into one interpretation
    #[serde(default, skip_serializing_if = "is_false")]
    pub makes_interpretation: bool,

    /// Group the action affects (overrides the context's group)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affects_group: Option<String>,

    /// Constraints the action declares it violates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violates_constraints: Vec<String>,

    /// Estimated duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_minutes: Option<f64>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub passes_through_residential: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub cargo_is_hazmat: bool,

    /// Any other caller-defined fields, including `violates_<constraint>` flags
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Self::default()
        }
    }

    pub fn with_requires_authority(mut self, level: impl Into<String>) -> Self {
        self.requires_authority = Some(level.into());
        self
    }

    pub fn with_binding(mut self, binding: bool) -> Self {
        self.is_binding = binding;
        self
    }

    pub fn with_commitment(mut self, commitment: bool) -> Self {
        self.makes_commitment = commitment;
        self
    }

    pub fn with_decision(mut self, decision: bool) -> Self {
        self.makes_decision = decision;
        self
    }

    pub fn with_interpretation(mut self, interpretation: bool) -> Self {
        self.makes_interpretation = interpretation;
        self
    }

    pub fn with_affects_group(mut self, group: impl Into<String>) -> Self {
        self.affects_group = Some(group.into());
        self
    }

    pub fn with_violated_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.violates_constraints.push(constraint.into());
        self
    }

    pub fn with_estimated_time(mut self, minutes: f64) -> Self {
        self.estimated_time_minutes = Some(minutes);
        self
    }

    pub fn with_residential_route(mut self, residential: bool) -> Self {
        self.passes_through_residential = residential;
        self
    }

    pub fn with_hazmat_cargo(mut self, hazmat: bool) -> Self {
        self.cargo_is_hazmat = hazmat;
        self
    }

    /// Set an arbitrary extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Read an extra boolean flag. Missing or non-boolean values are `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.extra.get(name).and_then(Value::as_bool).unwrap_or(false)
    }
}
