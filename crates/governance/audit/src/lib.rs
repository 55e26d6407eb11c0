//! # governance-kernel-audit
//!
//! Tamper-evident audit trail for governance decisions.
//!
//! Every verification is recorded as an [`AuditLogEntry`] carrying the hash
//! of the entry before it. Each entry's own hash is SHA-256 over a
//! sorted-key canonical JSON rendering of every other field, so mutating
//! any recorded field breaks [`AuditLogger::verify_chain`]. Tamper evidence
//! is a linked-hash check only; entries are not signed.
//!
//! When a log file is configured, each entry is also appended as one JSON
//! line. File writes are best-effort: a failure is logged and counted, never
//! propagated to the verification that produced the entry.

pub mod entry;
pub mod error;
pub mod file;
pub mod integrity;
pub mod logger;
pub mod query;
pub mod sanitize;

pub use entry::{AuditLogEntry, AuditOutcome};
pub use error::{AuditError, Result};
pub use file::read_log_file;
pub use integrity::{canonical_json, compute_hash, verify_entries, ChainVerification};
pub use logger::AuditLogger;
pub use query::{AuditQuery, OutcomeFilter};
pub use sanitize::{sanitize, REDACTED};
