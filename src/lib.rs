//! # prompt-triage
//!
//! A deterministic decision engine that turns a natural-language task
//! description into a structured risk/ambiguity assessment and a concrete
//! model-routing recommendation, without ever calling a language model.
//!
//! ## Architecture
//!
//! Four pure stages plus a lookup layer, composed left to right:
//! ```text
//! Rule Engine → Risk Scorer ─┐
//! Complexity Classifier ─────┼→ Profile Resolver → Model Router
//! ```
//! Every stage is a synchronous, side-effect-free function over immutable
//! inputs; concurrent callers need no coordination.

// ── Lint policy (aerospace-grade) ─────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod assess;
pub mod complexity;
pub mod profile;
pub mod risk;
pub mod routing;
pub mod rules;
pub mod tokens;

// Re-exports for convenience
pub use assess::{assess, assess_with_rules, AssessOptions, Assessment};
pub use complexity::{classify_complexity, classify_complexity_with, ComplexityResult, TaskComplexity};
pub use profile::{profile_spec, resolve_profile, suggest_profile, ProfileName, ProfileSpec, Sensitivity};
pub use risk::{
    derive_risk_level, elevated_level, score_risk, RiskDimension, RiskDimensions, RiskLevel,
    RiskScore, RISK_ESCALATION_THRESHOLD,
};
pub use routing::{route_model, ModelRecommendation, RoutingInput, Tier};
pub use rules::{
    evaluate_rules, Assumption, CustomRuleSpec, Question, RuleEngine, RuleOutcome, RuleSet,
    TaskCategory,
};
pub use tokens::{TokenEstimator, WordCountEstimator};

/// Initialise the global tracing subscriber.
///
/// Reads the `LOG_FORMAT` environment variable to choose output format:
/// - `"json"` — structured JSON output for production log aggregators
/// - anything else (including unset) — human-readable pretty output
///   for local development
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=info`).
///
/// # Errors
///
/// Returns [`TriageError::TracingInit`] if the global subscriber has
/// already been set (e.g. by a previous call or a test harness).
pub fn init_tracing() -> Result<(), TriageError> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_current_span(true)
            .with_span_list(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init(),
    };

    result.map_err(|e| TriageError::TracingInit(e.to_string()))
}

/// Top-level crate errors.
///
/// The core itself never fails on unexpected input (it clamps, skips, and
/// falls back instead); the only fallible surfaces are process-level setup
/// and custom-rule loading, and the latter reports its itemized errors
/// through [`rules::RuleError`] directly.
#[derive(Error, Debug)]
pub enum TriageError {
    /// Structured-logging initialisation failed (subscriber already set).
    #[error("tracing init failed: {0}")]
    TracingInit(String),
}
