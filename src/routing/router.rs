//! Model routing logic.
//!
//! Two-step deterministic tier selection (default tier from complexity and
//! risk, then budget/latency one-tier downgrades), a strict research-intent
//! override, provider lookup in the frozen catalog, a confidence formula,
//! savings against the fixed baseline, and a full `decision_path` audit
//! trail. Everything here is a pure function of its inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::complexity::TaskComplexity;
use crate::profile::{profile_spec, suggest_profile, ProfileName, Sensitivity};
use crate::risk::{derive_risk_level, RISK_ESCALATION_THRESHOLD};
use crate::tokens::{TokenEstimator, WordCountEstimator};

use super::catalog::{
    fallback_provider, model_for, provider_for_target, Tier, BASELINE_MODEL, RESEARCH_PROVIDER,
};
use super::cost::{estimate_cost, savings_summary, savings_vs_baseline, CostEstimate, SavingsReport};

/// Strict word-boundary pattern for research intent: phrases that mean the
/// user wants live/external lookup rather than reasoning over supplied
/// context. Kept deliberately narrow so ordinary prompts never match.
static RESEARCH_INTENT: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(search the web|web search|look (it )?up|with citations?|with sources|current news|latest news|browse)\b",
    )
    .map_err(|error| {
        warn!(%error, "research intent pattern failed to compile");
        error
    })
    .ok()
});

/// `true` if the raw prompt text carries research intent.
pub fn detect_research_intent(text: &str) -> bool {
    RESEARCH_INTENT
        .as_ref()
        .map(|pattern| pattern.is_match(text))
        .unwrap_or(false)
}

/// Input to one routing decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingInput {
    /// Free-form task type label for the rationale (e.g. "code").
    pub task_type: Option<String>,
    /// Classified task complexity.
    pub complexity: TaskComplexity,
    /// Caller budget sensitivity; when unset, the profile default applies.
    pub budget_sensitivity: Option<Sensitivity>,
    /// Caller latency sensitivity; when unset, the profile default applies.
    pub latency_sensitivity: Option<Sensitivity>,
    /// Supplied context size in tokens. Negative values are clamped to 0.
    pub context_tokens: i64,
    /// Risk score from the scorer; values above 100 are clamped.
    pub risk_score: u32,
    /// Explicit profile choice; when unset, one is suggested.
    pub profile: Option<ProfileName>,
}

/// The primary model recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryModel {
    /// Provider name.
    pub provider: String,
    /// Concrete model id.
    pub model: String,
    /// Sampling temperature to use.
    pub temperature: f64,
    /// Output token cap to request.
    pub max_tokens: u32,
}

/// A different-provider fallback with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackModel {
    /// Provider name; never equal to the primary provider.
    pub provider: String,
    /// Concrete model id.
    pub model: String,
    /// Why this fallback was chosen.
    pub reason: String,
}

/// Full routing recommendation with audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecommendation {
    /// Primary model to call.
    pub primary: PrimaryModel,
    /// Different-provider fallback.
    pub fallback: FallbackModel,
    /// Routing confidence from the fixed formula.
    pub confidence: u32,
    /// Cost estimate for the primary model.
    pub cost_estimate: CostEstimate,
    /// One-sentence explanation of the route.
    pub rationale: String,
    /// Trade-offs the caller accepts with this route.
    pub tradeoffs: Vec<String>,
    /// Savings against the fixed baseline model.
    pub savings_vs_default: SavingsReport,
    /// Human-readable savings one-liner.
    pub savings_summary: String,
    /// Ordered audit trail of every decision made.
    pub decision_path: Vec<String>,
}

/// Default tier for `(complexity, risk_score)`.
///
/// Uses the same escalation rule as profile suggestion: risk at or above
/// [`RISK_ESCALATION_THRESHOLD`] pushes `multi_step` and
/// `agent_orchestration` to `top`.
pub fn default_tier(complexity: TaskComplexity, risk_score: u32) -> Tier {
    match complexity {
        TaskComplexity::SimpleFactual => Tier::Small,
        TaskComplexity::Analytical | TaskComplexity::Creative | TaskComplexity::LongContext => {
            Tier::Mid
        }
        TaskComplexity::MultiStep | TaskComplexity::AgentOrchestration => {
            if risk_score >= RISK_ESCALATION_THRESHOLD {
                Tier::Top
            } else {
                Tier::Mid
            }
        }
    }
}

/// Produce a model recommendation for one request.
///
/// # Arguments
///
/// * `input` — Routing input (complexity, risk, sensitivities, profile).
/// * `raw_text` — The raw prompt, when available, for research-intent
///   detection and input-size estimation.
/// * `complexity_confidence` — Confidence from the classifier, if it ran.
/// * `target` — Caller's target ecosystem (e.g. "claude", "openai").
///
/// # Returns
///
/// A [`ModelRecommendation`] whose `decision_path` records, in evaluation
/// order: complexity, risk score, profile, default tier, applied
/// overrides, baseline model, selected model, and fallback model.
pub fn route_model(
    input: &RoutingInput,
    raw_text: Option<&str>,
    complexity_confidence: Option<u32>,
    target: Option<&str>,
) -> ModelRecommendation {
    let risk_score = input.risk_score.min(100);
    let mut path = Vec::with_capacity(9);
    path.push(format!("complexity={}", input.complexity.as_str()));
    path.push(format!("risk_score={risk_score}"));

    let (profile, profile_explicit) = match input.profile {
        Some(profile) => (profile, true),
        None => (suggest_profile(input.complexity, risk_score), false),
    };
    path.push(format!("profile={}", profile.as_str()));
    let spec = profile_spec(profile);

    // Step 1: default tier from complexity and risk.
    let mut tier = default_tier(input.complexity, risk_score);
    path.push(format!("default_tier={}", tier.as_str()));

    // Step 2: overrides. An explicit caller value always wins over the
    // profile default; each applied downgrade is recorded.
    let budget = input.budget_sensitivity.unwrap_or(spec.budget_sensitivity);
    let latency = input.latency_sensitivity.unwrap_or(spec.latency_sensitivity);
    let mut override_applied = false;

    if budget == Sensitivity::High {
        let lower = tier.downgrade();
        if lower != tier {
            path.push(format!(
                "budget_override=downgrade_{}→{}",
                tier.as_str(),
                lower.as_str()
            ));
            tier = lower;
            override_applied = true;
        }
    }

    if latency == Sensitivity::High {
        let lower = tier.downgrade();
        if lower != tier {
            path.push(format!(
                "latency_override=downgrade_{}→{}",
                tier.as_str(),
                lower.as_str()
            ));
            tier = lower;
            override_applied = true;
        }
    }

    // Research-intent override: forces the research provider regardless of
    // tier and target, and reduces confidence because it bypasses the tier
    // logic.
    let research = raw_text.map(detect_research_intent).unwrap_or(false);
    let provider = if research {
        path.push("research_intent=true".to_string());
        RESEARCH_PROVIDER
    } else {
        provider_for_target(target)
    };

    let entry = model_for(provider, tier);
    let fb_provider = fallback_provider(provider);
    let fb_entry = model_for(fb_provider, tier);

    path.push(format!("baseline={BASELINE_MODEL}"));
    path.push(format!("selected={}:{}", provider.as_str(), entry.model));
    path.push(format!("fallback={}:{}", fb_provider.as_str(), fb_entry.model));

    // Confidence: base 60; +10 for a confident classification; +10 for low
    // risk; −10 per bypass of the straight tier logic.
    let mut confidence: i32 = 60;
    if complexity_confidence.unwrap_or(0) >= 80 {
        confidence += 10;
    }
    if risk_score < 20 {
        confidence += 10;
    }
    if override_applied {
        confidence -= 10;
    }
    if research {
        confidence -= 10;
    }
    let confidence = confidence.max(0) as u32;

    let context_tokens = input.context_tokens.max(0) as u64;
    let prompt_tokens = raw_text
        .map(|text| WordCountEstimator::new().estimate(text))
        .unwrap_or(0);
    let input_tokens = context_tokens + prompt_tokens;
    let max_tokens = spec.max_tokens_cap.min(entry.max_tokens_cap);
    let output_tokens = u64::from(max_tokens);

    let cost_estimate = estimate_cost(entry.model, input_tokens, output_tokens);
    let savings = savings_vs_baseline(entry.model, input_tokens, output_tokens);
    let summary = savings_summary(&savings);

    let temperature = if profile_explicit {
        spec.temperature
    } else {
        entry.default_temperature
    };

    let mut tradeoffs = Vec::new();
    if override_applied {
        tradeoffs.push(
            "sensitivity overrides downgraded the tier; expect a lower quality ceiling".to_string(),
        );
    }
    if research {
        tradeoffs.push("research intent bypasses tier selection for live retrieval".to_string());
    }
    if tier == Tier::Small {
        tradeoffs.push("small-tier models may truncate long outputs".to_string());
    }

    let level = derive_risk_level(risk_score);
    let task_label = input.task_type.as_deref().unwrap_or("general");
    let rationale = format!(
        "{} {} task at {} risk routes to the {} tier; {} is the primary recommendation",
        input.complexity.as_str(),
        task_label,
        level.as_str(),
        tier.as_str(),
        entry.model
    );

    debug!(
        complexity = input.complexity.as_str(),
        risk = risk_score,
        tier = tier.as_str(),
        model = entry.model,
        "routing decision"
    );

    ModelRecommendation {
        primary: PrimaryModel {
            provider: provider.as_str().to_string(),
            model: entry.model.to_string(),
            temperature,
            max_tokens,
        },
        fallback: FallbackModel {
            provider: fb_provider.as_str().to_string(),
            model: fb_entry.model.to_string(),
            reason: format!(
                "different-provider fallback if {} is unavailable or rate limited",
                provider.as_str()
            ),
        },
        confidence,
        cost_estimate,
        rationale,
        tradeoffs,
        savings_vs_default: savings,
        savings_summary: summary,
        decision_path: path,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
