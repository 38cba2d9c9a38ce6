//! End-to-end assessment.
//!
//! Composes the four stages in their documented control flow: rule
//! evaluation feeds the risk scorer, the classifier runs on the same
//! input, then profile resolution and routing consume all three. Pure
//! composition; every stage stays independently callable.

use serde::{Deserialize, Serialize};

use crate::complexity::{classify_complexity, ComplexityResult};
use crate::profile::{resolve_profile, suggest_profile, ProfileName, Sensitivity};
use crate::risk::{elevated_level, score_risk, RiskLevel, RiskScore};
use crate::routing::{route_model, ModelRecommendation, RoutingInput};
use crate::rules::{Assumption, Question, RuleEngine, RuleSet, TaskCategory};
use crate::tokens::{TokenEstimator, WordCountEstimator};

/// Caller options for one assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessOptions {
    /// Task category for rule scoping; `None` is treated as general.
    pub category: Option<TaskCategory>,
    /// Requested profile name. Unknown names fall back to `balanced` with
    /// an audit entry; `None` lets the engine suggest one.
    pub profile: Option<String>,
    /// Caller budget sensitivity override.
    pub budget_sensitivity: Option<Sensitivity>,
    /// Caller latency sensitivity override.
    pub latency_sensitivity: Option<Sensitivity>,
    /// Target ecosystem for provider selection (e.g. "claude").
    pub target: Option<String>,
}

/// Aggregated output of one full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Dimensional risk score.
    pub risk: RiskScore,
    /// Risk level with rule elevations applied (never lower than
    /// `risk.level`).
    pub effective_risk_level: RiskLevel,
    /// Complexity classification.
    pub complexity: ComplexityResult,
    /// Resolved or suggested profile.
    pub profile: ProfileName,
    /// Final routing recommendation.
    pub recommendation: ModelRecommendation,
    /// Clarifying questions from every triggered rule, in rule order.
    pub questions: Vec<Question>,
    /// Assumptions from every triggered rule, in rule order.
    pub assumptions: Vec<Assumption>,
    /// Profile-resolution audit entries (empty unless a fallback fired).
    pub audit: Vec<String>,
}

/// Run the full pipeline with the built-in rule catalog.
pub fn assess(text: &str, context: Option<&str>, options: &AssessOptions) -> Assessment {
    assess_with_rules(&RuleEngine::new(RuleSet::builtin()), text, context, options)
}

/// Run the full pipeline with a caller-supplied rule engine (built-ins
/// plus any custom rules).
pub fn assess_with_rules(
    engine: &RuleEngine,
    text: &str,
    context: Option<&str>,
    options: &AssessOptions,
) -> Assessment {
    let outcomes = engine.evaluate(text, context, options.category);
    let risk = score_risk(&outcomes);
    let effective_risk_level = elevated_level(&risk, &outcomes);
    let complexity = classify_complexity(text, context);

    let mut audit = Vec::new();
    let profile = match options.profile.as_deref() {
        Some(name) => resolve_profile(Some(name), &mut audit),
        None => suggest_profile(complexity.complexity, risk.score),
    };

    let context_tokens = context
        .map(|c| WordCountEstimator::new().estimate(c) as i64)
        .unwrap_or(0);
    let input = RoutingInput {
        task_type: options.category.map(|c| c.as_str().to_string()),
        complexity: complexity.complexity,
        budget_sensitivity: options.budget_sensitivity,
        latency_sensitivity: options.latency_sensitivity,
        context_tokens,
        risk_score: risk.score,
        profile: Some(profile),
    };
    let recommendation = route_model(
        &input,
        Some(text),
        Some(complexity.confidence),
        options.target.as_deref(),
    );

    let questions = outcomes
        .iter()
        .filter(|o| o.triggered)
        .filter_map(|o| o.question.clone())
        .collect();
    let assumptions = outcomes
        .iter()
        .filter(|o| o.triggered)
        .filter_map(|o| o.assumption.clone())
        .collect();

    Assessment {
        risk,
        effective_risk_level,
        complexity,
        profile,
        recommendation,
        questions,
        assumptions,
        audit,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
