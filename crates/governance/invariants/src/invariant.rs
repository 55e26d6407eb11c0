use governance_kernel_state::CanonicalState;
use governance_kernel_types::{Action, Context, InvariantId};

/// A named rule every verified action must satisfy.
///
/// `check` must be total and side-effect free, and must read only the
/// canonical state. `explain` cites the raw context and action so audit
/// readers see the values the caller actually supplied.
pub trait Invariant: Send + Sync {
    /// Unique name (e.g. "AIT-1").
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str;

    /// Constitutional invariants block in every enforcement mode.
    /// Non-constitutional ones block only in strict mode.
    fn is_constitutional(&self) -> bool {
        true
    }

    /// True iff the invariant holds for `state`.
    fn check(&self, state: &CanonicalState) -> bool;

    /// Natural-language explanation of a violation.
    fn explain(&self, context: &Context, action: &Action) -> String;

    /// Built-in identifier, if the name matches one.
    fn builtin_id(&self) -> Option<InvariantId> {
        InvariantId::from_name(self.name())
    }
}
