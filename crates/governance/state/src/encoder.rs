use governance_kernel_types::{Action, AuthorityLevel, Context};
use tracing::{trace, warn};

use crate::constraint::ConstraintPattern;
use crate::state::CanonicalState;

/// Action-type keywords that make an action binding (case-insensitive substring).
pub const BINDING_KEYWORDS: [&str; 6] = ["execute", "commit", "sign", "approve", "transfer", "deploy"];

/// Identity prefix that marks a human consequence-bearer or decision-maker.
pub const HUMAN_PREFIX: &str = "human";

/// Encodes `(context, action)` into a [`CanonicalState`].
///
/// Pure and total: no side effects besides diagnostics, never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateEncoder;

impl StateEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, context: &Context, action: &Action) -> CanonicalState {
        let state = CanonicalState {
            authority_level: AuthorityLevel::parse_or_none(context.authority_level.as_deref()),
            requires_authority: AuthorityLevel::parse_or_none(action.requires_authority.as_deref()),
            is_binding_action: is_binding_action(action),
            human_in_authority_chain: has_human_authority(context),
            consequence_bearer: identity(context.consequence_bearer.as_deref()),
            makes_decision: action.makes_decision,
            hard_constraints: context.hard_constraints.iter().cloned().collect(),
            violated_constraints: constraint_violations(context, action).into_iter().collect(),
            makes_interpretation: action.makes_interpretation,
            interpretation_authority: context.interpretation_authority,
            affects_group: identity(action.affects_group.as_deref())
                .or_else(|| identity(context.affects_group.as_deref())),
            decision_maker: identity(context.decision_maker.as_deref()),
            delegated_authority_from_affected: context.delegated_authority_from_affected,
        };

        trace!(action_type = %action.action_type, ?state, "Encoded canonical state");
        state
    }
}

/// Constraints the action violates: the action's own declarations first,
/// then every context hard constraint whose pattern check fails.
/// Duplicates are dropped, first occurrence wins.
pub fn constraint_violations(context: &Context, action: &Action) -> Vec<String> {
    let mut violated: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !violated.iter().any(|v| v == name) {
            violated.push(name.to_string());
        }
    };

    for name in &action.violates_constraints {
        push(name);
    }

    for name in &context.hard_constraints {
        let pattern = ConstraintPattern::parse(name);
        if pattern.is_malformed() {
            warn!(constraint = %name, "Malformed hard constraint treated as not violated");
            continue;
        }
        if pattern.is_violated_by(action) {
            push(name);
        }
    }

    violated
}

fn is_binding_action(action: &Action) -> bool {
    let action_type = action.action_type.to_lowercase();
    let keyword_match = BINDING_KEYWORDS.iter().any(|kw| action_type.contains(kw));
    keyword_match || action.is_binding || action.makes_commitment
}

fn has_human_authority(context: &Context) -> bool {
    let human_bearer = context
        .consequence_bearer
        .as_deref()
        .is_some_and(|b| b.starts_with(HUMAN_PREFIX));
    let human_decision_maker = context
        .decision_maker
        .as_deref()
        .is_some_and(|d| d.starts_with(HUMAN_PREFIX));

    human_bearer
        || human_decision_maker
        || context.human_in_authority_chain
        || context.human_signature.is_some()
}

fn identity(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
