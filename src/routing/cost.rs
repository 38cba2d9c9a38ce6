//! Cost estimation and savings computation.
//!
//! A frozen pricing table (USD per million tokens, input and output rates
//! per model) shared by the router and by hosts that want standalone
//! estimates. Savings are always computed against the fixed
//! [`BASELINE_MODEL`](super::catalog::BASELINE_MODEL) and are non-negative
//! by construction: routing to a pricier model reports zero savings, never
//! negative.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::BASELINE_MODEL;

/// Pricing for one model, in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelRate {
    /// Input (prompt) rate.
    pub input_per_mtok: f64,
    /// Output (completion) rate.
    pub output_per_mtok: f64,
}

const fn rate(input_per_mtok: f64, output_per_mtok: f64) -> ModelRate {
    ModelRate {
        input_per_mtok,
        output_per_mtok,
    }
}

static RATES: &[(&str, ModelRate)] = &[
    ("claude-3-5-haiku", rate(0.80, 4.00)),
    ("claude-sonnet-4", rate(3.00, 15.00)),
    ("claude-opus-4", rate(15.00, 75.00)),
    ("gpt-4o-mini", rate(0.15, 0.60)),
    ("gpt-4o", rate(2.50, 10.00)),
    ("o1", rate(15.00, 60.00)),
    ("gemini-2.0-flash-lite", rate(0.075, 0.30)),
    ("gemini-2.0-flash", rate(0.10, 0.40)),
    ("gemini-2.5-pro", rate(1.25, 10.00)),
    ("sonar", rate(1.00, 1.00)),
    ("sonar-pro", rate(3.00, 15.00)),
    ("sonar-reasoning-pro", rate(2.00, 8.00)),
];

/// Pricing entry for a model, if the table knows it.
pub fn rate_for(model: &str) -> Option<&'static ModelRate> {
    RATES.iter().find(|(name, _)| *name == model).map(|(_, r)| r)
}

/// Cost estimate for one request against one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Model the estimate applies to.
    pub model: String,
    /// Estimated input (prompt + context) tokens.
    pub input_tokens: u64,
    /// Estimated output tokens.
    pub output_tokens: u64,
    /// Input cost in USD.
    pub input_cost_usd: f64,
    /// Output cost in USD.
    pub output_cost_usd: f64,
    /// Total cost in USD.
    pub total_cost_usd: f64,
}

/// Estimate the cost of a request.
///
/// Unknown models are priced at zero and logged; the core never fails on
/// unexpected input.
pub fn estimate_cost(model: &str, input_tokens: u64, output_tokens: u64) -> CostEstimate {
    let rate = match rate_for(model) {
        Some(rate) => *rate,
        None => {
            warn!(model, "no pricing entry; estimating zero cost");
            ModelRate {
                input_per_mtok: 0.0,
                output_per_mtok: 0.0,
            }
        }
    };
    let input_cost_usd = input_tokens as f64 / 1_000_000.0 * rate.input_per_mtok;
    let output_cost_usd = output_tokens as f64 / 1_000_000.0 * rate.output_per_mtok;
    CostEstimate {
        model: model.to_string(),
        input_tokens,
        output_tokens,
        input_cost_usd,
        output_cost_usd,
        total_cost_usd: input_cost_usd + output_cost_usd,
    }
}

/// Savings of a recommended model against the fixed baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    /// The baseline model compared against.
    pub baseline_model: String,
    /// What the baseline would have cost, in USD.
    pub baseline_cost_usd: f64,
    /// What the recommended model costs, in USD.
    pub recommended_cost_usd: f64,
    /// Savings as a percentage of baseline cost; never negative.
    pub savings_percent: f64,
}

/// Compare a recommended model's cost against the baseline at identical
/// token counts.
pub fn savings_vs_baseline(model: &str, input_tokens: u64, output_tokens: u64) -> SavingsReport {
    let recommended = estimate_cost(model, input_tokens, output_tokens);
    let baseline = estimate_cost(BASELINE_MODEL, input_tokens, output_tokens);
    let savings_percent = if baseline.total_cost_usd > 0.0 {
        ((baseline.total_cost_usd - recommended.total_cost_usd) / baseline.total_cost_usd * 100.0)
            .max(0.0)
    } else {
        0.0
    };
    SavingsReport {
        baseline_model: BASELINE_MODEL.to_string(),
        baseline_cost_usd: baseline.total_cost_usd,
        recommended_cost_usd: recommended.total_cost_usd,
        savings_percent,
    }
}

/// Human-readable one-liner for a savings report.
pub fn savings_summary(report: &SavingsReport) -> String {
    if report.savings_percent < 1.0 {
        format!("cost comparable to the {} baseline", report.baseline_model)
    } else {
        format!(
            "about {:.0}% cheaper than the {} baseline",
            report.savings_percent, report.baseline_model
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
