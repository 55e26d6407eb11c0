//! # governance-kernel
//!
//! A deterministic policy gate for decision-making agents. Given a declared
//! [`Context`] and a proposed [`Action`], the kernel returns an allow/block
//! decision, a prioritized [`Remediation`] when blocked, and a
//! tamper-evident audit record.
//!
//! ## Pipeline
//!
//! ```text
//! (context, action)
//!     -> StateEncoder   canonical state, total over any input
//!     -> Verifier       violated invariant names, in set order
//!     -> HandlerRegistry  one remediation, by fixed priority
//!     -> AuditLogger    hash-chained entry, returned as audit_id
//! ```
//!
//! When every candidate action is blocked,
//! [`GovernanceKernel::check_invariant_conflict`] reports an
//! [`InvariantConflict`] for a human to resolve instead of choosing among
//! them.
//!
//! ## Example
//!
//! ```
//! use governance_kernel::{Action, Context, GovernanceKernel};
//!
//! let kernel = GovernanceKernel::new();
//! let context = Context::new().with_authority_level("advisory");
//! let action = Action::new("respond").with_requires_authority("binding_decision");
//!
//! let result = kernel.verify(&context, &action);
//! assert!(!result.allowed);
//! assert!(result.violated("AIT-1"));
//! ```

pub mod config;
pub mod error;
pub mod kernel;
pub mod stats;
pub mod telemetry;

pub use config::{KernelConfig, LoggingConfig};
pub use error::{KernelError, Result};
pub use kernel::{verify_once, GovernanceKernel, GovernanceKernelBuilder};
pub use stats::KernelStats;

pub use governance_kernel_audit::{AuditLogEntry, AuditLogger, AuditQuery, ChainVerification};
pub use governance_kernel_invariants::{Invariant, InvariantSet};
pub use governance_kernel_state::CanonicalState;
pub use governance_kernel_types::{
    Action, AuthorityLevel, Context, Decision, Explanation, InvariantConflict, InvariantId,
    Remediation, VerificationResult,
};
