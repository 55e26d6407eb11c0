//! Audit query support

use chrono::{DateTime, Utc};

use crate::entry::AuditLogEntry;

/// Filter on the recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeFilter {
    Allowed,
    Blocked,
}

/// Query for audit entries. Results keep append order.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Filter by time range start (inclusive)
    pub from: Option<DateTime<Utc>>,

    /// Filter by time range end (inclusive)
    pub to: Option<DateTime<Utc>>,

    /// Filter by decision
    pub outcome: Option<OutcomeFilter>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn allowed_only(mut self) -> Self {
        self.outcome = Some(OutcomeFilter::Allowed);
        self
    }

    pub fn blocked_only(mut self) -> Self {
        self.outcome = Some(OutcomeFilter::Blocked);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if an entry matches this query (ignores `limit`).
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(from) = self.from {
            if entry.timestamp < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if entry.timestamp > to {
                return false;
            }
        }

        match self.outcome {
            Some(OutcomeFilter::Allowed) => entry.allowed(),
            Some(OutcomeFilter::Blocked) => !entry.allowed(),
            None => true,
        }
    }

    /// Apply this query to entries in append order.
    pub fn apply<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a AuditLogEntry>,
    ) -> Vec<AuditLogEntry> {
        let matching = entries.into_iter().filter(|e| self.matches(e)).cloned();
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
