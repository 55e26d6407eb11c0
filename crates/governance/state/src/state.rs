use governance_kernel_types::AuthorityLevel;
use serde::Serialize;
use std::collections::BTreeSet;

/// Normalized view of one `(context, action)` pair.
///
/// Produced fresh per verification and discarded afterwards. Every field has
/// a defined value; absent identities are `None`, absent flags are `false`,
/// absent constraint sets are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalState {
    /// Authority granted to the acting system
    pub authority_level: AuthorityLevel,
    /// Authority the action requires
    pub requires_authority: AuthorityLevel,
    /// Action creates a binding commitment
    pub is_binding_action: bool,
    /// Some human-authority evidence is present
    pub human_in_authority_chain: bool,
    pub consequence_bearer: Option<String>,
    pub makes_decision: bool,
    pub hard_constraints: BTreeSet<String>,
    pub violated_constraints: BTreeSet<String>,
    pub makes_interpretation: bool,
    pub interpretation_authority: bool,
    pub affects_group: Option<String>,
    pub decision_maker: Option<String>,
    pub delegated_authority_from_affected: bool,
}

impl CanonicalState {
    /// Hard constraints that are also violated, in sorted order.
    pub fn breached_constraints(&self) -> Vec<String> {
        self.hard_constraints
            .intersection(&self.violated_constraints)
            .cloned()
            .collect()
    }
}
