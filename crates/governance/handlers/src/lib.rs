//! # governance-kernel-handlers
//!
//! Maps violated invariant names to a single remediation. When several
//! invariants fail at once, exactly one primary violation is chosen by a
//! fixed total priority:
//!
//! **BG-1 > GI-1 > CMP-1 > AIT-1 > EXP-1 > MAP-1**
//!
//! Violations outside the built-in set fall back to the first name given,
//! and receive a generic "block, review governance requirements" response.
//! Remediation is pure: the caller decides whether and how to act on it.

pub mod registry;

pub use registry::HandlerRegistry;
