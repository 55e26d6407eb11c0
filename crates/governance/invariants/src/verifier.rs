use std::sync::Arc;

use governance_kernel_state::CanonicalState;
use tracing::debug;

use crate::invariant::Invariant;
use crate::set::InvariantSet;

/// Evaluates an invariant set against canonical state.
///
/// Pure in-memory boolean logic, O(number of invariants). No retries, no
/// timeouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    /// Names of violated invariants, in set order.
    pub fn check(&self, state: &CanonicalState, invariants: &InvariantSet) -> Vec<String> {
        self.violated(state, invariants)
            .into_iter()
            .map(|inv| inv.name().to_string())
            .collect()
    }

    /// The violated invariants themselves, in set order.
    pub fn violated<'a>(
        &self,
        state: &CanonicalState,
        invariants: &'a InvariantSet,
    ) -> Vec<&'a Arc<dyn Invariant>> {
        invariants
            .iter()
            .filter(|invariant| {
                let holds = invariant.check(state);
                if !holds {
                    debug!(invariant = invariant.name(), "Invariant violated");
                }
                !holds
            })
            .collect()
    }

    /// Whether a single invariant holds.
    pub fn check_single(&self, state: &CanonicalState, invariant: &dyn Invariant) -> bool {
        invariant.check(state)
    }
}
