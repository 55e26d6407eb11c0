//! # governance-kernel-invariants
//!
//! The authority-preservation invariants and the verifier that evaluates
//! them against a [`CanonicalState`](governance_kernel_state::CanonicalState).
//!
//! Each invariant is a pure predicate over canonical state plus an
//! explanation over the raw context and action. The six built-ins form the
//! default [`InvariantSet`]; callers may supply their own implementers of
//! [`Invariant`] alongside or instead of them.

pub mod builtin;
pub mod error;
pub mod invariant;
pub mod set;
pub mod verifier;

pub use builtin::{
    AuthorityInvariance, BoundaryGovernance, ConsequenceMemoryPairing,
    ExperienceAuthorityCoupling, GaugeInvariance, MeaningAuthorityPairing,
};
pub use error::InvariantError;
pub use invariant::Invariant;
pub use set::InvariantSet;
pub use verifier::Verifier;
