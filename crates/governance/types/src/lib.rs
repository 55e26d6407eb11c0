//! # governance-kernel-types
//!
//! Shared vocabulary for the Governance Kernel: the caller-supplied
//! [`Context`] and [`Action`] records, the ordered [`AuthorityLevel`] scale,
//! the closed set of built-in invariant identifiers, and the values the
//! kernel hands back ([`VerificationResult`], [`Remediation`],
//! [`InvariantConflict`], [`Explanation`]).
//!
//! ## Built-in invariants
//!
//! - **AIT-1** Authority Invariance: capability does not grant authority
//! - **BG-1** Boundary Governance: only humans bind reality
//! - **GI-1** Gauge Invariance: optimization preserves hard constraints
//! - **MAP-1** Meaning-Authority Pairing: meaning collapse needs authority
//! - **CMP-1** Consequence-Memory Pairing: decisions trace to bearers
//! - **EXP-1** Experience-Authority Coupling: experiencers hold authority

pub mod authority;
pub mod context;
pub mod invariant_id;
pub mod remediation;
pub mod result;

pub use authority::AuthorityLevel;
pub use context::{Action, Context};
pub use invariant_id::InvariantId;
pub use remediation::Remediation;
pub use result::{
    ConflictRemediation, Decision, EscalationPriority, Explanation, InvariantConflict,
    VerificationResult, ViolationDetail,
};
