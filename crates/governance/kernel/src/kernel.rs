//! The orchestrating kernel

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use governance_kernel_audit::AuditLogger;
use governance_kernel_handlers::HandlerRegistry;
use governance_kernel_invariants::{Invariant, InvariantSet, Verifier};
use governance_kernel_state::{constraint_violations, StateEncoder};
use governance_kernel_types::{
    Action, Context, Decision, Explanation, InvariantConflict, VerificationResult,
    ViolationDetail,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{validate_constraints, KernelConfig};
use crate::error::{KernelError, Result};
use crate::stats::KernelStats;

/// Policy gate that verifies proposed actions against an invariant set.
///
/// Pipeline per call: encode `(context, action)` into canonical state,
/// evaluate every invariant, pick a remediation when blocked, record the
/// decision in the audit trail. Safe to share across threads; the audit
/// chain and the statistics each sit behind their own lock.
pub struct GovernanceKernel {
    invariants: InvariantSet,
    encoder: StateEncoder,
    verifier: Verifier,
    handlers: HandlerRegistry,
    audit: Option<AuditLogger>,
    strict_mode: bool,
    latency_budget_us: u64,
    hard_constraints: Vec<String>,
    stats: Mutex<KernelStats>,
}

impl GovernanceKernel {
    /// The six built-in invariants, strict mode, in-memory audit trail.
    pub fn new() -> Self {
        Self::from_parts(
            InvariantSet::builtin(),
            Some(AuditLogger::in_memory()),
            true,
            KernelConfig::default().latency_budget_us,
            Vec::new(),
        )
    }

    pub fn builder() -> GovernanceKernelBuilder {
        GovernanceKernelBuilder::default()
    }

    /// Build a kernel with the built-in invariants from configuration.
    pub fn from_config(config: &KernelConfig) -> Result<Self> {
        Self::builder()
            .strict_mode(config.strict_mode)
            .enable_audit(config.enable_audit)
            .audit_log_file(config.audit_log_file.clone())
            .resume_audit_log(config.resume_audit_log)
            .latency_budget_us(config.latency_budget_us)
            .hard_constraints(config.hard_constraints.clone())
            .build()
    }

    fn from_parts(
        invariants: InvariantSet,
        audit: Option<AuditLogger>,
        strict_mode: bool,
        latency_budget_us: u64,
        hard_constraints: Vec<String>,
    ) -> Self {
        let stats = KernelStats::new(invariants.names());
        Self {
            invariants,
            encoder: StateEncoder::new(),
            verifier: Verifier::new(),
            handlers: HandlerRegistry::new(),
            audit,
            strict_mode,
            latency_budget_us,
            hard_constraints,
            stats: Mutex::new(stats),
        }
    }

    /// Verify one action.
    pub fn verify(&self, context: &Context, action: &Action) -> VerificationResult {
        self.verify_with_metadata(context, action, None)
    }

    /// Verify one action, attaching `metadata` to its audit entry.
    pub fn verify_with_metadata(
        &self,
        context: &Context,
        action: &Action,
        metadata: Option<Map<String, Value>>,
    ) -> VerificationResult {
        let start = Instant::now();
        let context = self.effective_context(context);

        let state = self.encoder.encode(&context, action);
        let (violations, warnings) = self.split_violations(
            self.verifier.violated(&state, &self.invariants),
        );

        let allowed = violations.is_empty();
        let remediation =
            (!allowed).then(|| self.handlers.handle(&violations, &context, action));

        let latency_us = start.elapsed().as_secs_f64() * 1_000_000.0;
        if latency_us > self.latency_budget_us as f64 {
            warn!(
                action_type = %action.action_type,
                latency_us,
                budget_us = self.latency_budget_us,
                "Verification exceeded latency budget"
            );
        }

        self.stats
            .lock()
            .record(allowed, &violations, &warnings, latency_us);

        if allowed {
            debug!(action_type = %action.action_type, latency_us, "Action allowed");
        } else {
            info!(
                action_type = %action.action_type,
                violations = ?violations,
                remediation = ?remediation.as_ref().map(|r| r.action_tag()),
                "Action blocked"
            );
        }
        if !warnings.is_empty() {
            warn!(
                action_type = %action.action_type,
                warnings = ?warnings,
                "Non-constitutional invariants violated"
            );
        }

        let mut result = VerificationResult {
            allowed,
            violations,
            warnings,
            remediation,
            audit_id: None,
            timestamp: Utc::now(),
            latency_us,
        };

        if let Some(audit) = &self.audit {
            result.audit_id = Some(audit.log_verification(&context, action, &result, metadata));
        }

        result
    }

    /// Verify each action independently against the same context.
    pub fn verify_batch(&self, context: &Context, actions: &[Action]) -> Vec<VerificationResult> {
        actions.iter().map(|action| self.verify(context, action)).collect()
    }

    /// Detect whether every candidate is blocked.
    ///
    /// Returns `None` if any candidate is allowed. Otherwise the conflict
    /// is surfaced for a human to resolve; the kernel never picks among
    /// blocked candidates. Every candidate is verified and audited.
    pub fn check_invariant_conflict(
        &self,
        context: &Context,
        candidates: &[Action],
    ) -> Option<InvariantConflict> {
        let results = self.verify_batch(context, candidates);
        if results.iter().any(|r| r.allowed) {
            return None;
        }

        let mut conflicting_invariants: Vec<String> = Vec::new();
        for result in &results {
            for name in &result.violations {
                if !conflicting_invariants.contains(name) {
                    conflicting_invariants.push(name.clone());
                }
            }
        }

        let context = self.effective_context(context);
        let mut conflicting_constraints: Vec<String> = Vec::new();
        for action in candidates {
            for name in constraint_violations(&context, action) {
                if context.hard_constraints.contains(&name)
                    && !conflicting_constraints.contains(&name)
                {
                    conflicting_constraints.push(name);
                }
            }
        }

        warn!(
            attempted_actions = candidates.len(),
            conflicting_invariants = ?conflicting_invariants,
            conflicting_constraints = ?conflicting_constraints,
            "Invariant conflict: escalating to human decision"
        );

        Some(InvariantConflict::new(
            conflicting_invariants,
            conflicting_constraints,
            candidates.len(),
        ))
    }

    /// Verify and explain each blocking violation.
    pub fn explain(&self, context: &Context, action: &Action) -> Explanation {
        let result = self.verify(context, action);

        let (decision, details) = if result.allowed {
            (Decision::Allowed, Vec::new())
        } else {
            let context = self.effective_context(context);
            let details = result
                .violations
                .iter()
                .filter_map(|name| self.invariants.get(name))
                .map(|invariant| ViolationDetail {
                    invariant: invariant.name().to_string(),
                    description: invariant.description().to_string(),
                    why_violated: invariant.explain(&context, action),
                })
                .collect();
            (Decision::Blocked, details)
        };

        Explanation {
            decision,
            violations: result.violations,
            latency_us: result.latency_us,
            details,
            remediation: result.remediation,
        }
    }

    /// Snapshot of the cumulative counters.
    pub fn stats(&self) -> KernelStats {
        self.stats.lock().clone()
    }

    pub fn reset_stats(&self) {
        self.stats.lock().reset();
    }

    pub fn invariants(&self) -> &InvariantSet {
        &self.invariants
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    /// Kernel-wide hard constraints merged into the caller's context.
    fn effective_context<'a>(&self, context: &'a Context) -> Cow<'a, Context> {
        let missing: Vec<&String> = self
            .hard_constraints
            .iter()
            .filter(|c| !context.hard_constraints.contains(c))
            .collect();
        if missing.is_empty() {
            return Cow::Borrowed(context);
        }

        let mut merged = context.clone();
        merged.hard_constraints.extend(missing.into_iter().cloned());
        Cow::Owned(merged)
    }

    /// Split violated invariants into (blocking, warning) names.
    fn split_violations(&self, violated: Vec<&Arc<dyn Invariant>>) -> (Vec<String>, Vec<String>) {
        let mut blocking = Vec::new();
        let mut warnings = Vec::new();
        for invariant in violated {
            let name = invariant.name().to_string();
            if self.strict_mode || invariant.is_constitutional() {
                blocking.push(name);
            } else {
                warnings.push(name);
            }
        }
        (blocking, warnings)
    }
}

impl Default for GovernanceKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GovernanceKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceKernel")
            .field("invariants", &self.invariants)
            .field("strict_mode", &self.strict_mode)
            .field("audit", &self.audit.is_some())
            .field("latency_budget_us", &self.latency_budget_us)
            .field("hard_constraints", &self.hard_constraints)
            .finish()
    }
}

/// Builder for [`GovernanceKernel`].
#[derive(Debug)]
pub struct GovernanceKernelBuilder {
    invariants: Option<InvariantSet>,
    enable_audit: bool,
    audit_logger: Option<AuditLogger>,
    audit_log_file: Option<PathBuf>,
    resume_audit_log: bool,
    strict_mode: bool,
    latency_budget_us: u64,
    hard_constraints: Vec<String>,
}

impl Default for GovernanceKernelBuilder {
    fn default() -> Self {
        let defaults = KernelConfig::default();
        Self {
            invariants: None,
            enable_audit: defaults.enable_audit,
            audit_logger: None,
            audit_log_file: defaults.audit_log_file,
            resume_audit_log: defaults.resume_audit_log,
            strict_mode: defaults.strict_mode,
            latency_budget_us: defaults.latency_budget_us,
            hard_constraints: defaults.hard_constraints,
        }
    }
}

impl GovernanceKernelBuilder {
    /// Replace the built-in invariants.
    pub fn invariants(mut self, invariants: InvariantSet) -> Self {
        self.invariants = Some(invariants);
        self
    }

    pub fn enable_audit(mut self, enable: bool) -> Self {
        self.enable_audit = enable;
        self
    }

    /// Use an existing logger. Takes precedence over `audit_log_file`.
    pub fn audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    pub fn audit_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.audit_log_file = path;
        self
    }

    pub fn resume_audit_log(mut self, resume: bool) -> Self {
        self.resume_audit_log = resume;
        self
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn latency_budget_us(mut self, budget: u64) -> Self {
        self.latency_budget_us = budget;
        self
    }

    pub fn hard_constraints(mut self, constraints: Vec<String>) -> Self {
        self.hard_constraints = constraints;
        self
    }

    pub fn build(self) -> Result<GovernanceKernel> {
        validate_constraints(&self.hard_constraints)?;

        let invariants = match self.invariants {
            Some(set) if set.is_empty() => {
                return Err(KernelError::Invariants(
                    governance_kernel_invariants::InvariantError::Empty,
                ))
            }
            Some(set) => set,
            None => InvariantSet::builtin(),
        };

        let audit = if !self.enable_audit {
            None
        } else if let Some(logger) = self.audit_logger {
            Some(logger)
        } else if let Some(path) = self.audit_log_file {
            if self.resume_audit_log {
                let logger = AuditLogger::resume(&path)
                    .map_err(|source| KernelError::AuditLog { path, source })?;
                Some(logger)
            } else {
                Some(AuditLogger::with_file(path))
            }
        } else {
            Some(AuditLogger::in_memory())
        };

        info!(
            invariants = ?invariants.names(),
            strict_mode = self.strict_mode,
            audit = audit.is_some(),
            "Governance kernel initialized"
        );

        Ok(GovernanceKernel::from_parts(
            invariants,
            audit,
            self.strict_mode,
            self.latency_budget_us,
            self.hard_constraints,
        ))
    }
}

/// One-off verification with a default kernel.
pub fn verify_once(context: &Context, action: &Action) -> VerificationResult {
    GovernanceKernel::new().verify(context, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_kernel_state::CanonicalState;
    use governance_kernel_types::Remediation;

    /// Non-constitutional mirror of CMP-1.
    struct NoSilentDecisions;

    impl Invariant for NoSilentDecisions {
        fn name(&self) -> &str {
            "OPS-1"
        }

        fn description(&self) -> &str {
            "Decisions must carry a consequence bearer"
        }

        fn is_constitutional(&self) -> bool {
            false
        }

        fn check(&self, state: &CanonicalState) -> bool {
            !state.makes_decision || state.consequence_bearer.is_some()
        }

        fn explain(&self, _context: &Context, action: &Action) -> String {
            format!("Action '{}' makes a silent decision", action.action_type)
        }
    }

    fn kernel_with_ops(strict: bool) -> GovernanceKernel {
        let invariants = InvariantSet::builtin()
            .with(Arc::new(NoSilentDecisions))
            .unwrap();
        GovernanceKernel::builder()
            .invariants(invariants)
            .strict_mode(strict)
            .build()
            .unwrap()
    }

    #[test]
    fn allowed_action_has_no_remediation() {
        let kernel = GovernanceKernel::new();
        let result = kernel.verify(&Context::new(), &Action::new("read_docs"));
        assert!(result.allowed);
        assert!(result.violations.is_empty());
        assert!(result.remediation.is_none());
        assert!(result.audit_id.is_some());
    }

    #[test]
    fn blocked_action_gets_remediation() {
        let kernel = GovernanceKernel::new();
        let result = kernel.verify(&Context::new(), &Action::new("deploy_service"));
        assert!(!result.allowed);
        assert_eq!(result.violations, vec!["BG-1"]);
        assert!(matches!(
            result.remediation,
            Some(Remediation::RequireHumanAuthority { .. })
        ));
    }

    #[test]
    fn strict_mode_blocks_on_custom_invariant() {
        let kernel = kernel_with_ops(true);
        let action = Action::new("ping").with_decision(true);
        let result = kernel.verify(&Context::new(), &action);
        assert!(!result.allowed);
        assert!(result.violated("CMP-1"));
        assert!(result.violated("OPS-1"));
        assert!(result.warnings.is_empty());

        let ctx = Context::new().with_consequence_bearer("human_ops");
        assert!(kernel.verify(&ctx, &action).allowed);
    }

    #[test]
    fn non_strict_mode_downgrades_non_constitutional() {
        let kernel = kernel_with_ops(false);
        let action = Action::new("ping").with_decision(true);
        let result = kernel.verify(&Context::new(), &action);

        // CMP-1 is constitutional and still blocks; OPS-1 only warns.
        assert!(!result.allowed);
        assert_eq!(result.violations, vec!["CMP-1"]);
        assert_eq!(result.warnings, vec!["OPS-1"]);

        let stats = kernel.stats();
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.violations_by_invariant["CMP-1"], 1);
        assert_eq!(stats.violations_by_invariant["OPS-1"], 1);
    }

    #[test]
    fn non_strict_mode_allows_when_only_warnings() {
        struct AlwaysWarns;
        impl Invariant for AlwaysWarns {
            fn name(&self) -> &str {
                "WARN-1"
            }
            fn description(&self) -> &str {
                "Always violated"
            }
            fn is_constitutional(&self) -> bool {
                false
            }
            fn check(&self, _state: &CanonicalState) -> bool {
                false
            }
            fn explain(&self, _context: &Context, _action: &Action) -> String {
                "always".into()
            }
        }

        let kernel = GovernanceKernel::builder()
            .invariants(InvariantSet::builtin().with(Arc::new(AlwaysWarns)).unwrap())
            .strict_mode(false)
            .build()
            .unwrap();
        let result = kernel.verify(&Context::new(), &Action::new("read"));
        assert!(result.allowed);
        assert!(result.violations.is_empty());
        assert!(result.remediation.is_none());
        assert_eq!(result.warnings, vec!["WARN-1"]);
    }

    #[test]
    fn stats_track_decisions() {
        let kernel = GovernanceKernel::new();
        kernel.verify(&Context::new(), &Action::new("read"));
        kernel.verify(&Context::new(), &Action::new("sign_contract"));

        let stats = kernel.stats();
        assert_eq!(stats.total_verifications, 2);
        assert_eq!(stats.allowed, 1);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.violations_by_invariant["BG-1"], 1);
        assert_eq!(stats.violations_by_invariant["AIT-1"], 0);
        assert_eq!(stats.violations_by_invariant.len(), 6);
        assert!(stats.avg_latency_us >= 0.0);

        kernel.reset_stats();
        let stats = kernel.stats();
        assert_eq!(stats.total_verifications, 0);
        assert_eq!(stats.violations_by_invariant["BG-1"], 0);
    }

    #[test]
    fn kernel_hard_constraints_apply_to_every_call() {
        let kernel = GovernanceKernel::builder()
            .hard_constraints(vec!["time_limit_10".into()])
            .build()
            .unwrap();
        let slow = Action::new("route").with_estimated_time(30.0);
        let result = kernel.verify(&Context::new(), &slow);
        assert_eq!(result.violations, vec!["GI-1"]);

        let entry = &kernel.audit_logger().unwrap().entries()[0];
        assert_eq!(entry.context["hard_constraints"][0], "time_limit_10");
    }

    #[test]
    fn malformed_kernel_constraint_rejected() {
        let err = GovernanceKernel::builder()
            .hard_constraints(vec!["time_limit_x".into()])
            .build()
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidConstraint { .. }));
    }

    #[test]
    fn empty_invariant_set_rejected() {
        let err = GovernanceKernel::builder()
            .invariants(InvariantSet::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, KernelError::Invariants(_)));
    }

    #[test]
    fn audit_disabled_has_no_ids() {
        let kernel = GovernanceKernel::from_config(&KernelConfig::unaudited()).unwrap();
        let result = kernel.verify(&Context::new(), &Action::new("read"));
        assert!(result.audit_id.is_none());
        assert!(kernel.audit_logger().is_none());
    }

    #[test]
    fn metadata_reaches_audit_entry() {
        let kernel = GovernanceKernel::new();
        let mut metadata = Map::new();
        metadata.insert("caller".into(), Value::from("assistant"));
        let result =
            kernel.verify_with_metadata(&Context::new(), &Action::new("read"), Some(metadata));

        let logger = kernel.audit_logger().unwrap();
        let entry = &logger.entries()[0];
        assert_eq!(Some(entry.audit_id), result.audit_id);
        assert_eq!(entry.metadata["caller"], "assistant");
    }

    #[test]
    fn explain_allowed_has_no_details() {
        let kernel = GovernanceKernel::new();
        let explanation = kernel.explain(&Context::new(), &Action::new("read"));
        assert_eq!(explanation.decision, Decision::Allowed);
        assert!(explanation.details.is_empty());
        assert!(explanation.remediation.is_none());
    }

    #[test]
    fn explain_blocked_details_each_violation() {
        let kernel = GovernanceKernel::new();
        let ctx = Context::new().with_authority_level("advisory");
        let action = Action::new("execute_trade").with_requires_authority("binding");
        let explanation = kernel.explain(&ctx, &action);

        assert_eq!(explanation.decision, Decision::Blocked);
        assert_eq!(explanation.violations, vec!["AIT-1", "BG-1"]);
        assert_eq!(explanation.details.len(), 2);
        assert_eq!(explanation.details[0].invariant, "AIT-1");
        assert!(!explanation.details[0].why_violated.is_empty());
        assert!(matches!(
            explanation.remediation,
            Some(Remediation::RequireHumanAuthority { .. })
        ));
    }

    #[test]
    fn verify_once_uses_builtins() {
        let ctx = Context::new().with_authority_level("advisory");
        let action = Action::new("respond").with_requires_authority("binding_decision");
        let result = verify_once(&ctx, &action);
        assert!(!result.allowed);
        assert!(result.violated("AIT-1"));
    }
}
