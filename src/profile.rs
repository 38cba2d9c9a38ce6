//! Optimization profiles.
//!
//! ## Responsibility
//! A frozen catalog of five named profiles bundling tier, temperature,
//! token cap, and sensitivity defaults, plus the pure mappings from
//! `(complexity, risk)` or an explicit user choice to a profile.
//!
//! ## Guarantees
//! - The catalog is process-wide immutable static data with no setters.
//! - `suggest_profile` is total and never returns `enterprise_safe` —
//!   that profile is selectable only by explicit user choice.
//! - `resolve_profile` never fails: unknown names fall back to `balanced`
//!   and leave exactly one entry in the caller's audit trail.

use serde::{Deserialize, Serialize};

use crate::complexity::TaskComplexity;
use crate::risk::RISK_ESCALATION_THRESHOLD;
use crate::routing::Tier;

/// Caller or profile sensitivity to budget or latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Cost/latency barely matters.
    Low,
    /// Default posture.
    Medium,
    /// Cost/latency dominates; triggers tier downgrades in the router.
    High,
}

/// The five named optimization profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    /// Cheapest viable model, aggressive caps.
    CostMinimizer,
    /// Middle-of-the-road defaults.
    Balanced,
    /// Top tier, quality over cost.
    QualityFirst,
    /// Higher temperature for ideation work.
    Creative,
    /// Conservative settings for regulated environments. Never
    /// auto-suggested; explicit user choice only.
    EnterpriseSafe,
}

impl ProfileName {
    /// Stable lowercase name used in audit trails.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CostMinimizer => "cost_minimizer",
            Self::Balanced => "balanced",
            Self::QualityFirst => "quality_first",
            Self::Creative => "creative",
            Self::EnterpriseSafe => "enterprise_safe",
        }
    }

    /// Parse a profile name; `None` for anything unrecognized.
    pub fn parse(name: &str) -> Option<ProfileName> {
        match name {
            "cost_minimizer" => Some(Self::CostMinimizer),
            "balanced" => Some(Self::Balanced),
            "quality_first" => Some(Self::QualityFirst),
            "creative" => Some(Self::Creative),
            "enterprise_safe" => Some(Self::EnterpriseSafe),
            _ => None,
        }
    }

    /// Every profile, in catalog order.
    pub fn all() -> [ProfileName; 5] {
        [
            Self::CostMinimizer,
            Self::Balanced,
            Self::QualityFirst,
            Self::Creative,
            Self::EnterpriseSafe,
        ]
    }
}

/// Frozen settings bundle for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSpec {
    /// Preferred capability tier.
    pub tier: Tier,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f64,
    /// Cap on output tokens.
    pub max_tokens_cap: u32,
    /// Default budget sensitivity, applied only when the caller leaves the
    /// field unset.
    pub budget_sensitivity: Sensitivity,
    /// Default latency sensitivity, applied only when the caller leaves
    /// the field unset.
    pub latency_sensitivity: Sensitivity,
}

static COST_MINIMIZER: ProfileSpec = ProfileSpec {
    tier: Tier::Small,
    temperature: 0.2,
    max_tokens_cap: 1_024,
    budget_sensitivity: Sensitivity::High,
    latency_sensitivity: Sensitivity::High,
};

static BALANCED: ProfileSpec = ProfileSpec {
    tier: Tier::Mid,
    temperature: 0.5,
    max_tokens_cap: 4_096,
    budget_sensitivity: Sensitivity::Medium,
    latency_sensitivity: Sensitivity::Medium,
};

static QUALITY_FIRST: ProfileSpec = ProfileSpec {
    tier: Tier::Top,
    temperature: 0.7,
    max_tokens_cap: 8_192,
    budget_sensitivity: Sensitivity::Low,
    latency_sensitivity: Sensitivity::Low,
};

static CREATIVE: ProfileSpec = ProfileSpec {
    tier: Tier::Mid,
    temperature: 0.9,
    max_tokens_cap: 4_096,
    budget_sensitivity: Sensitivity::Medium,
    latency_sensitivity: Sensitivity::Low,
};

static ENTERPRISE_SAFE: ProfileSpec = ProfileSpec {
    tier: Tier::Top,
    temperature: 0.1,
    max_tokens_cap: 4_096,
    budget_sensitivity: Sensitivity::Low,
    latency_sensitivity: Sensitivity::Medium,
};

/// The frozen spec for a profile.
pub fn profile_spec(name: ProfileName) -> &'static ProfileSpec {
    match name {
        ProfileName::CostMinimizer => &COST_MINIMIZER,
        ProfileName::Balanced => &BALANCED,
        ProfileName::QualityFirst => &QUALITY_FIRST,
        ProfileName::Creative => &CREATIVE,
        ProfileName::EnterpriseSafe => &ENTERPRISE_SAFE,
    }
}

/// Suggest a profile for `(complexity, risk_score)`.
///
/// Total over all inputs. `multi_step` and `agent_orchestration` escalate
/// to `quality_first` at or above [`RISK_ESCALATION_THRESHOLD`];
/// `enterprise_safe` is never returned.
pub fn suggest_profile(complexity: TaskComplexity, risk_score: u32) -> ProfileName {
    match complexity {
        TaskComplexity::SimpleFactual => ProfileName::CostMinimizer,
        TaskComplexity::Analytical | TaskComplexity::LongContext => ProfileName::Balanced,
        TaskComplexity::MultiStep | TaskComplexity::AgentOrchestration => {
            if risk_score >= RISK_ESCALATION_THRESHOLD {
                ProfileName::QualityFirst
            } else {
                ProfileName::Balanced
            }
        }
        TaskComplexity::Creative => ProfileName::Creative,
    }
}

/// Resolve an optional caller-supplied profile name.
///
/// - `None` resolves to `balanced` silently.
/// - A recognized name passes through unchanged.
/// - An unrecognized name resolves to `balanced` and appends exactly one
///   fallback entry to `audit`.
///
/// The audit trail is a caller-owned single-writer buffer for the duration
/// of one pipeline invocation; this function appends in place.
pub fn resolve_profile(name: Option<&str>, audit: &mut Vec<String>) -> ProfileName {
    match name {
        None => ProfileName::Balanced,
        Some(raw) => match ProfileName::parse(raw) {
            Some(profile) => profile,
            None => {
                audit.push(format!("profile_fallback={raw}→balanced"));
                ProfileName::Balanced
            }
        },
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
