use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or resuming an audit log file.
///
/// Appending never surfaces these; see [`crate::AuditLogger`].
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit log I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed audit log line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
