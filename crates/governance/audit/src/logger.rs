//! Hash-chained audit logger

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use governance_kernel_types::{Action, Context, VerificationResult};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entry::{AuditLogEntry, AuditOutcome};
use crate::error::Result;
use crate::file::{append_entry, read_log_file};
use crate::integrity::{compute_hash, verify_entries, ChainVerification};
use crate::query::AuditQuery;
use crate::sanitize::sanitize;

/// Entries plus the hash the next entry links to. Guarded together so
/// that concurrent appends form a single linear chain.
#[derive(Debug, Default)]
struct AuditChain {
    entries: Vec<AuditLogEntry>,
    previous_hash: Option<String>,
}

/// Append-only audit trail of verification decisions.
///
/// Safe to share across threads. Entries are never mutated or removed
/// through this API.
#[derive(Debug)]
pub struct AuditLogger {
    chain: Mutex<AuditChain>,
    log_file: Option<PathBuf>,
    write_failures: AtomicU64,
}

impl AuditLogger {
    /// Logger that keeps entries in memory only.
    pub fn in_memory() -> Self {
        Self {
            chain: Mutex::new(AuditChain::default()),
            log_file: None,
            write_failures: AtomicU64::new(0),
        }
    }

    /// Logger that also appends each entry to `path` as a JSON line.
    ///
    /// The in-memory chain starts empty; use [`AuditLogger::resume`] to
    /// continue an existing file.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file: Some(path.into()),
            ..Self::in_memory()
        }
    }

    /// Load an existing log file and continue its chain.
    ///
    /// A missing file starts a fresh chain.
    pub fn resume(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_log_file(&path)?;
        let previous_hash = entries.last().map(|e| e.hash.clone());

        info!(
            path = %path.display(),
            entries = entries.len(),
            "Resumed audit log"
        );

        Ok(Self {
            chain: Mutex::new(AuditChain {
                entries,
                previous_hash,
            }),
            log_file: Some(path),
            write_failures: AtomicU64::new(0),
        })
    }

    /// Record one verification and return its audit ID.
    ///
    /// Context and action are sanitized before storage. A failed file write
    /// is logged and counted; the in-memory entry is kept either way.
    pub fn log_verification(
        &self,
        context: &Context,
        action: &Action,
        result: &VerificationResult,
        metadata: Option<Map<String, Value>>,
    ) -> Uuid {
        let context = sanitize(&serde_json::to_value(context).unwrap_or_default());
        let action = sanitize(&serde_json::to_value(action).unwrap_or_default());

        let mut chain = self.chain.lock();

        let mut entry = AuditLogEntry {
            audit_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            context,
            action,
            result: AuditOutcome::from(result),
            metadata: metadata.unwrap_or_default(),
            previous_hash: chain.previous_hash.clone(),
            hash: String::new(),
        };
        entry.hash = compute_hash(&entry);
        let audit_id = entry.audit_id;

        if let Some(path) = &self.log_file {
            if let Err(e) = append_entry(path, &entry) {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    audit_id = %audit_id,
                    error = %e,
                    "Failed to append audit entry to log file"
                );
            }
        }

        debug!(
            audit_id = %audit_id,
            allowed = entry.result.allowed,
            "Recorded audit entry"
        );

        chain.previous_hash = Some(entry.hash.clone());
        chain.entries.push(entry);

        audit_id
    }

    /// Whether the in-memory chain is intact.
    pub fn verify_chain(&self) -> bool {
        self.verify_chain_report().valid
    }

    /// Replay the in-memory chain and report where it breaks, if anywhere.
    pub fn verify_chain_report(&self) -> ChainVerification {
        let chain = self.chain.lock();
        let report = verify_entries(&chain.entries);
        if !report.valid {
            warn!(
                first_invalid_index = ?report.first_invalid_index,
                error = ?report.error_message,
                "Audit chain verification failed"
            );
        }
        report
    }

    /// Entries matching `query`, in append order.
    pub fn get_logs(&self, query: &AuditQuery) -> Vec<AuditLogEntry> {
        query.apply(self.chain.lock().entries.iter())
    }

    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.chain.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.chain.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hash the next entry will link to.
    pub fn head_hash(&self) -> Option<String> {
        self.chain.lock().previous_hash.clone()
    }

    /// Number of entries that could not be written to the log file.
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AuditQuery;
    use governance_kernel_types::Remediation;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn result(allowed: bool) -> VerificationResult {
        VerificationResult {
            allowed,
            violations: if allowed { vec![] } else { vec!["AIT-1".into()] },
            warnings: vec![],
            remediation: if allowed {
                None
            } else {
                Some(Remediation::Block {
                    reason: "blocked".into(),
                    suggested_action: "Review governance requirements".into(),
                })
            },
            audit_id: None,
            timestamp: Utc::now(),
            latency_us: 3.0,
        }
    }

    fn record(logger: &AuditLogger, allowed: bool) -> Uuid {
        let ctx = Context::new().with_authority_level("advisory");
        let action = Action::new("respond");
        logger.log_verification(&ctx, &action, &result(allowed), None)
    }

    #[test]
    fn entries_link_to_predecessor() {
        let logger = AuditLogger::in_memory();
        record(&logger, true);
        record(&logger, false);

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].previous_hash, None);
        assert_eq!(entries[1].previous_hash.as_deref(), Some(entries[0].hash.as_str()));
        assert_eq!(logger.head_hash().as_deref(), Some(entries[1].hash.as_str()));
        assert!(logger.verify_chain());
    }

    #[test]
    fn returned_id_matches_entry() {
        let logger = AuditLogger::in_memory();
        let id = record(&logger, true);
        assert_eq!(logger.entries()[0].audit_id, id);
    }

    #[test]
    fn tampering_breaks_chain() {
        let logger = AuditLogger::in_memory();
        for i in 0..4 {
            record(&logger, i % 2 == 0);
        }
        assert!(logger.verify_chain());

        logger.chain.lock().entries[2].result.allowed = true;

        let report = logger.verify_chain_report();
        assert!(!report.valid);
        assert_eq!(report.first_invalid_index, Some(2));
    }

    #[test]
    fn sensitive_fields_are_redacted() {
        let logger = AuditLogger::in_memory();
        let ctx = Context::new()
            .with_authority_level("binding")
            .with_field("api_password", serde_json::json!("hunter2"));
        let action = Action::new("login").with_field("client_secret", serde_json::json!("s3"));
        logger.log_verification(&ctx, &action, &result(true), None);

        let entry = &logger.entries()[0];
        assert_eq!(entry.context["api_password"], crate::REDACTED);
        assert_eq!(entry.context["authority_level"], "binding");
        assert_eq!(entry.action["client_secret"], crate::REDACTED);
        assert_eq!(entry.action["type"], "login");
    }

    #[test]
    fn metadata_is_recorded() {
        let logger = AuditLogger::in_memory();
        let mut metadata = Map::new();
        metadata.insert("request_id".into(), serde_json::json!("req-7"));
        logger.log_verification(
            &Context::new(),
            &Action::new("noop"),
            &result(true),
            Some(metadata),
        );
        assert_eq!(logger.entries()[0].metadata["request_id"], "req-7");
    }

    #[test]
    fn get_logs_filters() {
        let logger = AuditLogger::in_memory();
        record(&logger, true);
        record(&logger, false);
        record(&logger, false);

        assert_eq!(logger.get_logs(&AuditQuery::all().blocked_only()).len(), 2);
        assert_eq!(logger.get_logs(&AuditQuery::all().allowed_only()).len(), 1);
        assert_eq!(logger.get_logs(&AuditQuery::all().limit(1)).len(), 1);
    }

    #[test]
    fn file_mirrors_memory_and_resume_continues_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let logger = AuditLogger::with_file(&path);
        record(&logger, true);
        record(&logger, false);
        assert_eq!(logger.write_failures(), 0);

        let on_disk = read_log_file(&path).unwrap();
        assert_eq!(on_disk, logger.entries());
        assert!(verify_entries(&on_disk).valid);

        let resumed = AuditLogger::resume(&path).unwrap();
        assert_eq!(resumed.len(), 2);
        assert_eq!(resumed.head_hash(), logger.head_hash());
        record(&resumed, true);

        let on_disk = read_log_file(&path).unwrap();
        assert_eq!(on_disk.len(), 3);
        assert!(verify_entries(&on_disk).valid);
    }

    #[test]
    fn file_failure_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append.
        let logger = AuditLogger::with_file(dir.path());
        let id = record(&logger, true);

        assert_eq!(logger.write_failures(), 1);
        assert_eq!(logger.entries()[0].audit_id, id);
        assert!(logger.verify_chain());
    }

    #[test]
    fn concurrent_appends_form_one_chain() {
        let logger = Arc::new(AuditLogger::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        record(&logger, (t + i) % 3 != 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(logger.len(), 200);
        assert!(logger.verify_chain());
    }

    proptest! {
        #[test]
        fn any_sequence_verifies(outcomes in proptest::collection::vec(any::<bool>(), 0..20)) {
            let logger = AuditLogger::in_memory();
            for allowed in &outcomes {
                record(&logger, *allowed);
            }
            prop_assert_eq!(logger.len(), outcomes.len());
            prop_assert!(logger.verify_chain());
        }
    }
}
