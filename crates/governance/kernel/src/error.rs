use std::path::PathBuf;

use governance_kernel_audit::AuditError;
use governance_kernel_invariants::InvariantError;
use thiserror::Error;

/// Errors raised while building or configuring a kernel.
///
/// Verification itself never fails; these cover construction only.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid hard constraint '{name}': {reason}")]
    InvalidConstraint { name: String, reason: String },

    #[error("Invalid invariant set: {0}")]
    Invariants(#[from] InvariantError),

    #[error("Failed to open audit log {path}: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: AuditError,
    },

    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
