use std::sync::Arc;

use crate::builtin::{
    AuthorityInvariance, BoundaryGovernance, ConsequenceMemoryPairing,
    ExperienceAuthorityCoupling, GaugeInvariance, MeaningAuthorityPairing,
};
use crate::error::InvariantError;
use crate::invariant::Invariant;

/// Ordered collection of uniquely named invariants.
///
/// Evaluation order is insertion order; verifiers report violations in this
/// order. Cloning shares the underlying invariant objects.
#[derive(Clone, Default)]
pub struct InvariantSet {
    invariants: Vec<Arc<dyn Invariant>>,
}

impl InvariantSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The six built-ins, in canonical order: AIT-1, BG-1, GI-1, MAP-1, CMP-1, EXP-1.
    pub fn builtin() -> Self {
        Self {
            invariants: vec![
                Arc::new(AuthorityInvariance),
                Arc::new(BoundaryGovernance),
                Arc::new(GaugeInvariance),
                Arc::new(MeaningAuthorityPairing),
                Arc::new(ConsequenceMemoryPairing),
                Arc::new(ExperienceAuthorityCoupling),
            ],
        }
    }

    /// Build from a caller-supplied list. Names must be unique and the list
    /// must not be empty.
    pub fn from_invariants(
        invariants: impl IntoIterator<Item = Arc<dyn Invariant>>,
    ) -> Result<Self, InvariantError> {
        let mut set = Self::new();
        for invariant in invariants {
            set.push(invariant)?;
        }
        if set.is_empty() {
            return Err(InvariantError::Empty);
        }
        Ok(set)
    }

    /// Append an invariant, rejecting duplicate names.
    pub fn push(&mut self, invariant: Arc<dyn Invariant>) -> Result<(), InvariantError> {
        if self.get(invariant.name()).is_some() {
            return Err(InvariantError::Duplicate(invariant.name().to_string()));
        }
        self.invariants.push(invariant);
        Ok(())
    }

    /// Builder form of [`InvariantSet::push`].
    pub fn with(mut self, invariant: Arc<dyn Invariant>) -> Result<Self, InvariantError> {
        self.push(invariant)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Invariant>> {
        self.invariants.iter().find(|i| i.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Invariant>> {
        self.invariants.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.invariants.iter().map(|i| i.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl std::fmt::Debug for InvariantSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_kernel_state::CanonicalState;
    use governance_kernel_types::{Action, Context};

    struct AlwaysFails;

    impl Invariant for AlwaysFails {
        fn name(&self) -> &str {
            "CUSTOM-1"
        }
        fn description(&self) -> &str {
            "Always violated"
        }
        fn check(&self, _state: &CanonicalState) -> bool {
            false
        }
        fn explain(&self, _context: &Context, _action: &Action) -> String {
            "always".into()
        }
    }

    #[test]
    fn builtin_has_six_in_order() {
        let set = InvariantSet::builtin();
        assert_eq!(set.len(), 6);
        assert_eq!(
            set.names(),
            vec!["AIT-1", "BG-1", "GI-1", "MAP-1", "CMP-1", "EXP-1"]
        );
        assert!(set.iter().all(|i| i.is_constitutional()));
        assert!(set.iter().all(|i| i.builtin_id().is_some()));
    }

    #[test]
    fn custom_invariants_extend_the_set() {
        let set = InvariantSet::builtin().with(Arc::new(AlwaysFails)).unwrap();
        assert_eq!(set.len(), 7);
        assert!(set.get("CUSTOM-1").is_some());
        assert!(set.get("CUSTOM-1").unwrap().builtin_id().is_none());
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = InvariantSet::builtin()
            .with(Arc::new(BoundaryGovernance))
            .unwrap_err();
        assert_eq!(err, InvariantError::Duplicate("BG-1".into()));
    }

    #[test]
    fn empty_custom_list_is_rejected() {
        let err = InvariantSet::from_invariants(Vec::new()).unwrap_err();
        assert_eq!(err, InvariantError::Empty);
    }
}
