//! JSON-lines audit file support

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::entry::AuditLogEntry;
use crate::error::{AuditError, Result};

/// Read every entry from a JSON-lines audit file, in file order.
///
/// Blank lines are skipped. A missing file reads as empty.
pub fn read_log_file(path: impl AsRef<Path>) -> Result<Vec<AuditLogEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| AuditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| AuditError::MalformedLine {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Append one entry as a JSON line, creating the file and its parent
/// directories as needed.
pub(crate) fn append_entry(path: &Path, entry: &AuditLogEntry) -> Result<()> {
    let io_err = |source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}
