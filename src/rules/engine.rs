//! Rule evaluation.
//!
//! Evaluates the merged rule set (built-ins in catalog order, then custom
//! rules sorted by id) against one input, producing one [`RuleOutcome`] per
//! rule. Evaluation never fails: a custom rule whose pattern does not
//! compile is skipped with a warning and reported as untriggered.

use regex::Regex;
use tracing::warn;

use super::catalog::{EvalInput, BUILTIN_RULES};
use super::custom::{CustomRuleSpec, RuleSet};
use super::types::{RuleOutcome, TaskCategory};

/// Evaluate the built-in catalog against one input.
///
/// Convenience wrapper over [`RuleEngine`] for hosts that never load
/// custom rules.
///
/// # Arguments
///
/// * `text` — The raw task description.
/// * `context` — Optional grounding context supplied alongside the task.
/// * `category` — Task category; `None` is treated as general.
///
/// # Returns
///
/// One outcome per rule, in catalog order.
pub fn evaluate_rules(
    text: &str,
    context: Option<&str>,
    category: Option<TaskCategory>,
) -> Vec<RuleOutcome> {
    RuleEngine::new(RuleSet::builtin()).evaluate(text, context, category)
}

/// Evaluator over a merged rule set.
///
/// Stateless apart from the rule set itself; `evaluate` is a pure function
/// of its arguments and may be called concurrently from any number of
/// threads.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    /// Create an engine over `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The rule set this engine evaluates.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate every rule against one input.
    ///
    /// Built-in rules run first in catalog order, then custom rules in id
    /// order. Rules outside the task's category produce untriggered
    /// outcomes, so the output length and order are the same for every
    /// input against a given rule set.
    pub fn evaluate(
        &self,
        text: &str,
        context: Option<&str>,
        category: Option<TaskCategory>,
    ) -> Vec<RuleOutcome> {
        let category = category.unwrap_or(TaskCategory::General);
        let lower = text.to_lowercase();
        let input = EvalInput {
            lower: &lower,
            context,
        };

        let mut outcomes = Vec::with_capacity(BUILTIN_RULES.len() + self.rules.custom_len());
        for def in BUILTIN_RULES {
            if !def.scope.applies_to(category) {
                outcomes.push(RuleOutcome::untriggered(
                    def.id,
                    def.severity,
                    def.dimension,
                    def.weight,
                ));
                continue;
            }
            let outcome = match (def.check)(&input) {
                Some(hit) => RuleOutcome {
                    rule_name: def.id.to_string(),
                    severity: def.severity,
                    dimension: def.dimension,
                    weight: def.weight,
                    triggered: true,
                    message: hit.message,
                    question: hit.question,
                    assumption: hit.assumption,
                    risk_elevation: hit.risk_elevation,
                },
                None => {
                    RuleOutcome::untriggered(def.id, def.severity, def.dimension, def.weight)
                }
            };
            outcomes.push(outcome);
        }

        for spec in self.rules.custom_rules() {
            outcomes.push(evaluate_custom(spec, text, category));
        }

        outcomes
    }
}

/// Evaluate a single custom rule. Pattern compilation happens here, per
/// rule, so one bad pattern can never abort the batch.
fn evaluate_custom(spec: &CustomRuleSpec, text: &str, category: TaskCategory) -> RuleOutcome {
    if !spec.applies_to.applies_to(category) {
        return RuleOutcome::untriggered(&spec.id, spec.severity, spec.dimension, spec.weight);
    }

    let matcher = match Regex::new(&spec.pattern) {
        Ok(matcher) => matcher,
        Err(error) => {
            warn!(rule = %spec.id, %error, "skipping custom rule: pattern failed to compile");
            return RuleOutcome::untriggered(&spec.id, spec.severity, spec.dimension, spec.weight);
        }
    };

    if !matcher.is_match(text) {
        return RuleOutcome::untriggered(&spec.id, spec.severity, spec.dimension, spec.weight);
    }

    if let Some(negative) = &spec.negative_pattern {
        match Regex::new(negative) {
            Ok(suppressor) => {
                if suppressor.is_match(text) {
                    return RuleOutcome::untriggered(
                        &spec.id,
                        spec.severity,
                        spec.dimension,
                        spec.weight,
                    );
                }
            }
            Err(error) => {
                warn!(rule = %spec.id, %error, "skipping custom rule: negative pattern failed to compile");
                return RuleOutcome::untriggered(
                    &spec.id,
                    spec.severity,
                    spec.dimension,
                    spec.weight,
                );
            }
        }
    }

    RuleOutcome {
        rule_name: spec.id.clone(),
        severity: spec.severity,
        dimension: spec.dimension,
        weight: spec.weight,
        triggered: true,
        message: spec.message.clone(),
        question: None,
        assumption: None,
        risk_elevation: spec.risk_elevation,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskDimension;
    use crate::rules::types::RuleSeverity;

    fn custom(id: &str, pattern: &str) -> CustomRuleSpec {
        CustomRuleSpec {
            id: id.into(),
            severity: RuleSeverity::NonBlocking,
            dimension: RiskDimension::Scope,
            weight: 5,
            applies_to: crate::rules::types::TaskScope::All,
            pattern: pattern.into(),
            negative_pattern: None,
            message: format!("custom finding from {id}"),
            risk_elevation: None,
        }
    }

    // -- builtin evaluation ----------------------------------------------

    #[test]
    fn test_one_outcome_per_builtin_rule_in_catalog_order() {
        let outcomes = evaluate_rules("say hello", None, None);
        assert_eq!(outcomes.len(), BUILTIN_RULES.len());
        for (outcome, def) in outcomes.iter().zip(BUILTIN_RULES) {
            assert_eq!(outcome.rule_name, def.id);
        }
    }

    #[test]
    fn test_benign_input_triggers_nothing() {
        let outcomes = evaluate_rules("say hello", None, None);
        assert!(outcomes.iter().all(|o| !o.triggered));
    }

    #[test]
    fn test_destructive_input_triggers_expected_rule() {
        let outcomes = evaluate_rules("delete the staging database", None, None);
        let destructive = outcomes
            .iter()
            .find(|o| o.rule_name == "destructive_no_safety");
        assert!(destructive.map(|o| o.triggered).unwrap_or(false));
    }

    #[test]
    fn test_outcome_length_same_for_every_input() {
        let a = evaluate_rules("say hello", None, None);
        let b = evaluate_rules("delete everything and improve it all", None, None);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let text = "only modify the parser, but also update the lexer";
        let a = evaluate_rules(text, None, None);
        let b = evaluate_rules(text, None, None);
        assert_eq!(a, b);
    }

    // -- category scoping ------------------------------------------------

    #[test]
    fn test_code_scoped_rule_inactive_for_general_tasks() {
        let text = "migrate the users table to the new schema";
        let outcomes = evaluate_rules(text, None, Some(TaskCategory::General));
        let rollback = outcomes.iter().find(|o| o.rule_name == "no_rollback_plan");
        assert!(!rollback.map(|o| o.triggered).unwrap_or(true));
    }

    #[test]
    fn test_code_scoped_rule_active_for_code_tasks() {
        let text = "migrate the users table to the new schema";
        let outcomes = evaluate_rules(text, None, Some(TaskCategory::Code));
        let rollback = outcomes.iter().find(|o| o.rule_name == "no_rollback_plan");
        assert!(rollback.map(|o| o.triggered).unwrap_or(false));
    }

    #[test]
    fn test_none_category_treated_as_general() {
        let text = "migrate the users table to the new schema";
        let with_none = evaluate_rules(text, None, None);
        let with_general = evaluate_rules(text, None, Some(TaskCategory::General));
        assert_eq!(with_none, with_general);
    }

    // -- custom rules ----------------------------------------------------

    #[test]
    fn test_custom_rule_appended_after_builtins() {
        let set = RuleSet::with_custom_rules(vec![custom("flags_kubernetes", r"(?i)\bkubernetes\b")])
            .unwrap_or_default();
        let engine = RuleEngine::new(set);
        let outcomes = engine.evaluate("restart the kubernetes cluster", None, None);
        assert_eq!(outcomes.len(), BUILTIN_RULES.len() + 1);
        let last = &outcomes[outcomes.len() - 1];
        assert_eq!(last.rule_name, "flags_kubernetes");
        assert!(last.triggered);
        assert_eq!(last.message, "custom finding from flags_kubernetes");
    }

    #[test]
    fn test_custom_rule_not_matching_is_untriggered() {
        let set = RuleSet::with_custom_rules(vec![custom("flags_kubernetes", r"(?i)\bkubernetes\b")])
            .unwrap_or_default();
        let engine = RuleEngine::new(set);
        let outcomes = engine.evaluate("water the office plants", None, None);
        let last = &outcomes[outcomes.len() - 1];
        assert!(!last.triggered);
        assert!(last.message.is_empty());
    }

    #[test]
    fn test_negative_pattern_suppresses_trigger() {
        let mut spec = custom("flags_force_push", r"(?i)force push");
        spec.negative_pattern = Some(r"(?i)to (a|my) fork".into());
        let set = RuleSet::with_custom_rules(vec![spec]).unwrap_or_default();
        let engine = RuleEngine::new(set);

        let plain = engine.evaluate("force push the release branch", None, None);
        assert!(plain[plain.len() - 1].triggered);

        let suppressed = engine.evaluate("force push the branch to my fork", None, None);
        assert!(!suppressed[suppressed.len() - 1].triggered);
    }

    #[test]
    fn test_invalid_pattern_is_skipped_not_fatal() {
        // "([" passes schema validation (shape only) but fails to compile;
        // evaluation must skip it and keep going.
        let set = RuleSet::with_custom_rules(vec![
            custom("broken_rule", r"(["),
            custom("working_rule", r"(?i)\bkubernetes\b"),
        ])
        .unwrap_or_default();
        let engine = RuleEngine::new(set);
        let outcomes = engine.evaluate("restart the kubernetes cluster", None, None);
        assert_eq!(outcomes.len(), BUILTIN_RULES.len() + 2);

        let broken = outcomes.iter().find(|o| o.rule_name == "broken_rule");
        assert!(!broken.map(|o| o.triggered).unwrap_or(true));

        let working = outcomes.iter().find(|o| o.rule_name == "working_rule");
        assert!(working.map(|o| o.triggered).unwrap_or(false));
    }

    #[test]
    fn test_invalid_negative_pattern_skips_rule() {
        let mut spec = custom("flags_kubernetes", r"(?i)\bkubernetes\b");
        spec.negative_pattern = Some(r"([".into());
        let set = RuleSet::with_custom_rules(vec![spec]).unwrap_or_default();
        let engine = RuleEngine::new(set);
        let outcomes = engine.evaluate("restart the kubernetes cluster", None, None);
        let last = &outcomes[outcomes.len() - 1];
        assert!(!last.triggered, "a rule with a broken suppressor must be skipped");
    }

    #[test]
    fn test_custom_rule_scoped_to_category() {
        let mut spec = custom("flags_kubernetes", r"(?i)\bkubernetes\b");
        spec.applies_to = crate::rules::types::TaskScope::Code;
        let set = RuleSet::with_custom_rules(vec![spec]).unwrap_or_default();
        let engine = RuleEngine::new(set);

        let general = engine.evaluate("restart the kubernetes cluster", None, None);
        assert!(!general[general.len() - 1].triggered);

        let code = engine.evaluate(
            "restart the kubernetes cluster",
            None,
            Some(TaskCategory::Code),
        );
        assert!(code[code.len() - 1].triggered);
    }

    #[test]
    fn test_custom_rule_elevation_carried_into_outcome() {
        let mut spec = custom("flags_kubernetes", r"(?i)\bkubernetes\b");
        spec.risk_elevation = Some(crate::risk::RiskLevel::High);
        let set = RuleSet::with_custom_rules(vec![spec]).unwrap_or_default();
        let engine = RuleEngine::new(set);
        let outcomes = engine.evaluate("restart the kubernetes cluster", None, None);
        assert_eq!(
            outcomes[outcomes.len() - 1].risk_elevation,
            Some(crate::risk::RiskLevel::High)
        );
    }
}
