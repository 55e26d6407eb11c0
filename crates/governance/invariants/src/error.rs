use thiserror::Error;

/// Errors from assembling an invariant set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("duplicate invariant name: {0}")]
    Duplicate(String),

    #[error("invariant set is empty")]
    Empty,
}
