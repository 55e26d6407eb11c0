//! # governance-kernel-state
//!
//! Maps raw `(Context, Action)` records into the [`CanonicalState`] every
//! invariant reads. Encoding is total: every field has a fallback, so no
//! invariant ever observes undefined state and the encoder never fails.

pub mod constraint;
pub mod encoder;
pub mod state;

pub use constraint::ConstraintPattern;
pub use encoder::{constraint_violations, StateEncoder, BINDING_KEYWORDS, HUMAN_PREFIX};
pub use state::CanonicalState;
