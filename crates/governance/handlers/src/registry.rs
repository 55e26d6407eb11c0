use governance_kernel_state::constraint_violations;
use governance_kernel_types::{Action, Context, InvariantId, Remediation};
use tracing::debug;

/// Registry of remediation templates, one per built-in invariant.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandlerRegistry;

impl HandlerRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Remediation for a set of violations.
    ///
    /// Empty violations yield [`Remediation::Allow`].
    pub fn handle(&self, violations: &[String], context: &Context, action: &Action) -> Remediation {
        let Some(primary) = self.primary_violation(violations) else {
            return Remediation::Allow;
        };

        debug!(
            primary = primary,
            total = violations.len(),
            "Selected primary violation"
        );

        match InvariantId::from_name(primary) {
            Some(InvariantId::Ait1) => handle_ait1(context, action),
            Some(InvariantId::Bg1) => handle_bg1(action),
            Some(InvariantId::Gi1) => handle_gi1(context, action),
            Some(InvariantId::Map1) => handle_map1(),
            Some(InvariantId::Cmp1) => handle_cmp1(),
            Some(InvariantId::Exp1) => handle_exp1(context, action),
            None => handle_default(violations),
        }
    }

    /// The violation to remediate first: the highest-priority built-in
    /// present, else the first entry.
    pub fn primary_violation<'a>(&self, violations: &'a [String]) -> Option<&'a str> {
        InvariantId::PRIORITY
            .iter()
            .find_map(|id| violations.iter().find(|v| v.as_str() == id.as_str()))
            .or_else(|| violations.first())
            .map(String::as_str)
    }
}

fn handle_ait1(context: &Context, action: &Action) -> Remediation {
    let current = context.authority_level.as_deref().unwrap_or("none");
    let required = action.requires_authority.as_deref().unwrap_or("unknown");
    Remediation::ReturnToAuthority {
        reason: format!("Action requires {} authority, system has {}", required, current),
        required_authority_level: required.to_string(),
        current_authority_level: current.to_string(),
        suggested_action: "Escalate to appropriate authority level".into(),
    }
}

fn handle_bg1(action: &Action) -> Remediation {
    Remediation::RequireHumanAuthority {
        reason: "Binding action requires human in authority chain".into(),
        suggested_action: "Obtain explicit human authorization before proceeding".into(),
        binding_action_type: action.action_type.clone(),
    }
}

fn handle_gi1(context: &Context, action: &Action) -> Remediation {
    let violated_constraints = constraint_violations(context, action)
        .into_iter()
        .filter(|c| context.hard_constraints.contains(c))
        .collect();
    Remediation::RespectHardConstraints {
        reason: "Action violates hard constraints that cannot be optimized away".into(),
        violated_constraints,
        suggested_action: "Find alternative that satisfies all constraints".into(),
    }
}

fn handle_map1() -> Remediation {
    Remediation::ObtainInterpretationAuthority {
        reason: "Interpreting ambiguous meaning requires explicit authority".into(),
        suggested_action: "Escalate interpretation to authorized decision-maker".into(),
    }
}

fn handle_cmp1() -> Remediation {
    Remediation::IdentifyConsequenceBearer {
        reason: "Decision must trace to entity that bears consequences".into(),
        suggested_action: "Explicitly identify who bears consequences of this decision".into(),
    }
}

fn handle_exp1(context: &Context, action: &Action) -> Remediation {
    let affected = action
        .affects_group
        .as_deref()
        .or(context.affects_group.as_deref())
        .unwrap_or("unknown");
    Remediation::DelegateToAffected {
        reason: "Those who experience consequences must hold authority".into(),
        affected_group: affected.to_string(),
        suggested_action: format!("Obtain authorization from {}", affected),
    }
}

fn handle_default(violations: &[String]) -> Remediation {
    Remediation::Block {
        reason: format!("Unknown invariant violations: [{}]", violations.join(", ")),
        suggested_action: "Review governance requirements".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_violations_allow() {
        let remediation =
            HandlerRegistry::new().handle(&[], &Context::default(), &Action::default());
        assert_eq!(remediation, Remediation::Allow);
    }

    #[test]
    fn bg1_outranks_ait1() {
        let registry = HandlerRegistry::new();
        let violations = names(&["AIT-1", "BG-1"]);
        assert_eq!(registry.primary_violation(&violations), Some("BG-1"));

        let remediation = registry.handle(
            &violations,
            &Context::new().with_authority_level("advisory"),
            &Action::new("execute_trade").with_requires_authority("binding"),
        );
        assert_eq!(remediation.action_tag(), "require_human_authority");
        match remediation {
            Remediation::RequireHumanAuthority {
                binding_action_type,
                ..
            } => assert_eq!(binding_action_type, "execute_trade"),
            other => panic!("unexpected remediation {:?}", other),
        }
    }

    #[test]
    fn full_priority_order() {
        let registry = HandlerRegistry::new();
        let mut remaining = names(&["MAP-1", "EXP-1", "AIT-1", "CMP-1", "GI-1", "BG-1"]);
        for expected in ["BG-1", "GI-1", "CMP-1", "AIT-1", "EXP-1", "MAP-1"] {
            assert_eq!(registry.primary_violation(&remaining), Some(expected));
            remaining.retain(|v| v != expected);
        }
        assert_eq!(registry.primary_violation(&remaining), None);
    }

    #[test]
    fn custom_violation_falls_back_to_first() {
        let registry = HandlerRegistry::new();
        let violations = names(&["CUSTOM-2", "CUSTOM-1"]);
        assert_eq!(registry.primary_violation(&violations), Some("CUSTOM-2"));

        let remediation = registry.handle(&violations, &Context::default(), &Action::default());
        assert_eq!(remediation.action_tag(), "block");
        assert!(remediation.reason().unwrap().contains("CUSTOM-2"));
    }

    #[test]
    fn builtin_beats_custom_even_when_later() {
        let violations = names(&["CUSTOM-1", "MAP-1"]);
        assert_eq!(
            HandlerRegistry::new().primary_violation(&violations),
            Some("MAP-1")
        );
    }

    #[test]
    fn ait1_names_both_levels() {
        let remediation = HandlerRegistry::new().handle(
            &names(&["AIT-1"]),
            &Context::new().with_authority_level("advisory"),
            &Action::new("respond").with_requires_authority("binding_decision"),
        );
        let value = serde_json::to_value(&remediation).unwrap();
        assert_eq!(value["action"], "return_to_authority");
        assert_eq!(value["required_authority_level"], "binding_decision");
        assert_eq!(value["current_authority_level"], "advisory");
    }

    #[test]
    fn gi1_lists_breached_hard_constraints() {
        let context = Context::new()
            .with_hard_constraint("no_residential_hazmat")
            .with_hard_constraint("time_limit_10");
        let action = Action::new("select_route")
            .with_residential_route(true)
            .with_hazmat_cargo(true)
            .with_estimated_time(8.0);
        match HandlerRegistry::new().handle(&names(&["GI-1"]), &context, &action) {
            Remediation::RespectHardConstraints {
                violated_constraints,
                ..
            } => assert_eq!(violated_constraints, vec!["no_residential_hazmat"]),
            other => panic!("unexpected remediation {:?}", other),
        }
    }

    #[test]
    fn exp1_names_affected_group() {
        let remediation = HandlerRegistry::new().handle(
            &names(&["EXP-1"]),
            &Context::new().with_affects_group("residents"),
            &Action::new("rezone"),
        );
        match remediation {
            Remediation::DelegateToAffected {
                affected_group,
                suggested_action,
                ..
            } => {
                assert_eq!(affected_group, "residents");
                assert_eq!(suggested_action, "Obtain authorization from residents");
            }
            other => panic!("unexpected remediation {:?}", other),
        }
    }

    #[test]
    fn remediation_is_deterministic() {
        let registry = HandlerRegistry::new();
        let violations = names(&["CMP-1", "MAP-1"]);
        let a = registry.handle(&violations, &Context::default(), &Action::default());
        let b = registry.handle(&violations, &Context::default(), &Action::default());
        assert_eq!(a, b);
        assert_eq!(a.action_tag(), "identify_consequence_bearer");
    }
}
