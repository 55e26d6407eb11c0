use governance_kernel_state::{constraint_violations, CanonicalState};
use governance_kernel_types::{Action, Context, InvariantId};

use crate::invariant::Invariant;

// =========================================================================
// THE 6 BUILT-IN INVARIANTS
// =========================================================================

/// AIT-1 (Authority Invariance): capability does not grant authority.
///
/// Holds iff the granted authority level ranks at least as high as the
/// level the action requires (`none < advisory < binding < autonomous`).
pub struct AuthorityInvariance;

impl Invariant for AuthorityInvariance {
    fn name(&self) -> &str {
        InvariantId::Ait1.as_str()
    }
    fn description(&self) -> &str {
        "Authority Invariance - capability does not grant authority"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        state.authority_level >= state.requires_authority
    }
    fn explain(&self, context: &Context, action: &Action) -> String {
        let system_auth = context.authority_level.as_deref().unwrap_or("none");
        let required_auth = action.requires_authority.as_deref().unwrap_or("unknown");
        format!(
            "System has '{}' authority but action requires '{}' authority. \
             Capability to execute does not grant authority to execute.",
            system_auth, required_auth
        )
    }
}

/// BG-1 (Boundary Governance): only humans bind reality.
///
/// A binding action needs human-authority evidence in the chain.
pub struct BoundaryGovernance;

impl Invariant for BoundaryGovernance {
    fn name(&self) -> &str {
        InvariantId::Bg1.as_str()
    }
    fn description(&self) -> &str {
        "Boundary Governance - only humans can bind reality"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        !state.is_binding_action || state.human_in_authority_chain
    }
    fn explain(&self, _context: &Context, action: &Action) -> String {
        format!(
            "Action '{}' creates a binding commitment or irreversible consequence, \
             but no human authority is present. Only humans can bind reality.",
            action.action_type
        )
    }
}

/// GI-1 (Gauge Invariance): optimization preserves hard constraints.
///
/// No hard constraint may appear in the violated set.
pub struct GaugeInvariance;

impl Invariant for GaugeInvariance {
    fn name(&self) -> &str {
        InvariantId::Gi1.as_str()
    }
    fn description(&self) -> &str {
        "Gauge Invariance - optimization preserves constraints"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        state
            .hard_constraints
            .is_disjoint(&state.violated_constraints)
    }
    fn explain(&self, context: &Context, action: &Action) -> String {
        let breached: Vec<String> = constraint_violations(context, action)
            .into_iter()
            .filter(|c| context.hard_constraints.contains(c))
            .collect();
        format!(
            "Action violates hard constraints: [{}]. These constraints are invariant \
             under optimization and cannot be reinterpreted or traded off.",
            breached.join(", ")
        )
    }
}

/// MAP-1 (Meaning-Authority Pairing): meaning collapse needs authority.
pub struct MeaningAuthorityPairing;

impl Invariant for MeaningAuthorityPairing {
    fn name(&self) -> &str {
        InvariantId::Map1.as_str()
    }
    fn description(&self) -> &str {
        "Meaning-Authority Pairing - meaning collapse needs authority"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        !state.makes_interpretation || state.interpretation_authority
    }
    fn explain(&self, _context: &Context, action: &Action) -> String {
        format!(
            "Action '{}' interprets ambiguous meaning or policy, but lacks authority \
             to make that interpretation. Meaning collapse requires explicit authority.",
            action.action_type
        )
    }
}

/// CMP-1 (Consequence-Memory Pairing): decisions trace to bearers.
pub struct ConsequenceMemoryPairing;

impl Invariant for ConsequenceMemoryPairing {
    fn name(&self) -> &str {
        InvariantId::Cmp1.as_str()
    }
    fn description(&self) -> &str {
        "Consequence-Memory Pairing - decisions trace to bearers"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        !state.makes_decision || state.consequence_bearer.is_some()
    }
    fn explain(&self, _context: &Context, action: &Action) -> String {
        format!(
            "Action '{}' makes a consequential decision but no consequence-bearer is \
             identified. Every decision must trace to an entity that bears the consequences.",
            action.action_type
        )
    }
}

/// EXP-1 (Experience-Authority Coupling): experiencers hold authority.
///
/// When both an affected group and a decision-maker are identified, they
/// must match, or the affected group must have delegated authority.
pub struct ExperienceAuthorityCoupling;

impl Invariant for ExperienceAuthorityCoupling {
    fn name(&self) -> &str {
        InvariantId::Exp1.as_str()
    }
    fn description(&self) -> &str {
        "Experience-Authority Coupling - experiencers hold authority"
    }
    fn check(&self, state: &CanonicalState) -> bool {
        match (&state.affects_group, &state.decision_maker) {
            (Some(affected), Some(decider)) => {
                affected == decider || state.delegated_authority_from_affected
            }
            _ => true,
        }
    }
    fn explain(&self, context: &Context, action: &Action) -> String {
        let affects = action
            .affects_group
            .as_deref()
            .or(context.affects_group.as_deref())
            .unwrap_or("unknown");
        let decider = context.decision_maker.as_deref().unwrap_or("unknown");
        format!(
            "Action affects '{}' but decision is made by '{}'. Those who experience \
             consequences must hold or delegate authority for decisions affecting them.",
            affects, decider
        )
    }
}
