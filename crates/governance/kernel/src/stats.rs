use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cumulative verification counters for one kernel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelStats {
    pub total_verifications: u64,
    pub allowed: u64,
    pub blocked: u64,
    /// Violations per invariant name, blocking and warning-only alike.
    /// Every invariant in the kernel's set has an entry, starting at zero.
    pub violations_by_invariant: BTreeMap<String, u64>,
    /// Running mean of verification latency
    pub avg_latency_us: f64,
}

impl KernelStats {
    /// Zeroed counters with one slot per invariant name.
    pub fn new<I, S>(invariant_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            violations_by_invariant: invariant_names
                .into_iter()
                .map(|name| (name.into(), 0))
                .collect(),
            ..Self::default()
        }
    }

    /// Fold one decision into the counters.
    pub(crate) fn record(
        &mut self,
        allowed: bool,
        violations: &[String],
        warnings: &[String],
        latency_us: f64,
    ) {
        self.total_verifications += 1;
        if allowed {
            self.allowed += 1;
        } else {
            self.blocked += 1;
        }

        for name in violations.iter().chain(warnings) {
            *self.violations_by_invariant.entry(name.clone()).or_insert(0) += 1;
        }

        let n = self.total_verifications as f64;
        self.avg_latency_us += (latency_us - self.avg_latency_us) / n;
    }

    /// Zero every counter, keeping the per-invariant slots.
    pub(crate) fn reset(&mut self) {
        self.total_verifications = 0;
        self.allowed = 0;
        self.blocked = 0;
        self.avg_latency_us = 0.0;
        for count in self.violations_by_invariant.values_mut() {
            *count = 0;
        }
    }

    /// Fraction of verifications that were blocked.
    pub fn block_rate(&self) -> f64 {
        if self.total_verifications == 0 {
            0.0
        } else {
            self.blocked as f64 / self.total_verifications as f64
        }
    }
}
