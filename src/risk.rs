//! Dimensional risk scoring.
//!
//! ## Responsibility
//! Fold a list of rule outcomes into a four-dimension risk score and derive
//! a coarse risk level from fixed thresholds.
//!
//! ## Guarantees
//! - Deterministic: the same outcomes always produce the same score, and
//!   dimension order in the output never varies with evaluation order.
//! - Bounded: `score` is clamped to `[0, 100]`.
//! - `level` is a pure function of `score` — it is always recomputed from
//!   the thresholds, never stored independently.
//!
//! ## NOT Responsible For
//! - Deciding which rules trigger (that belongs to `rules`)
//! - Mapping risk to tiers or profiles (that belongs to `routing`/`profile`)

use serde::{Deserialize, Serialize};

use crate::rules::RuleOutcome;

/// Risk score at or above which profile suggestion and tier selection
/// escalate `multi_step`/`agent_orchestration` tasks to the top tier.
pub const RISK_ESCALATION_THRESHOLD: u32 = 40;

/// Maximum value of a risk score.
const MAX_RISK_SCORE: u32 = 100;

/// Coarse risk level derived from a numeric score.
///
/// Ordered so that [`RiskLevel::elevate`] is a plain maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score 0–29.
    Low,
    /// Score 30–59.
    Medium,
    /// Score 60–100.
    High,
}

impl RiskLevel {
    /// Stable lowercase name for audit trails and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Combine with another level, keeping the higher of the two.
    ///
    /// Rule elevations propagate upward only: an elevation can raise the
    /// effective level but never lower it below the base.
    pub fn elevate(self, other: RiskLevel) -> RiskLevel {
        self.max(other)
    }
}

/// One of the four weighted risk categories a rule can accrue to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDimension {
    /// The task is missing details needed to execute it correctly.
    Underspec,
    /// The task invites fabricated facts (no grounding supplied).
    Hallucination,
    /// The task's blast radius is larger than it appears.
    Scope,
    /// The task carries contradictory or missing safety constraints.
    Constraint,
}

impl RiskDimension {
    /// Stable lowercase name for serialized rule definitions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Underspec => "underspec",
            Self::Hallucination => "hallucination",
            Self::Scope => "scope",
            Self::Constraint => "constraint",
        }
    }
}

/// Per-dimension accumulators of triggered rule weights.
///
/// Field order is fixed and matches serialized output regardless of the
/// order rules were evaluated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDimensions {
    /// Accumulated underspecification weight.
    pub underspec: u32,
    /// Accumulated hallucination-risk weight.
    pub hallucination: u32,
    /// Accumulated scope-risk weight.
    pub scope: u32,
    /// Accumulated constraint-risk weight.
    pub constraint: u32,
}

impl RiskDimensions {
    /// Sum of all four dimensions, before clamping.
    pub fn total(&self) -> u32 {
        self.underspec + self.hallucination + self.scope + self.constraint
    }

    fn add(&mut self, dimension: RiskDimension, weight: u32) {
        match dimension {
            RiskDimension::Underspec => self.underspec += weight,
            RiskDimension::Hallucination => self.hallucination += weight,
            RiskDimension::Scope => self.scope += weight,
            RiskDimension::Constraint => self.constraint += weight,
        }
    }
}

/// Dimensional risk score for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Total triggered weight, clamped to `[0, 100]`.
    pub score: u32,
    /// Per-dimension breakdown (unclamped accumulators).
    pub dimensions: RiskDimensions,
    /// Level derived from `score` via the fixed thresholds.
    pub level: RiskLevel,
}

/// Derive the risk level for a score.
///
/// Pure step function: `s < 30 → low`, `30 <= s < 60 → medium`,
/// `s >= 60 → high`.
pub fn derive_risk_level(score: u32) -> RiskLevel {
    if score < 30 {
        RiskLevel::Low
    } else if score < 60 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Fold rule outcomes into a [`RiskScore`].
///
/// Each triggered outcome adds its weight to its dimension; the score is
/// the dimension sum clamped to 100, and the level is derived from the
/// clamped score.
///
/// # Arguments
///
/// * `outcomes` — The full outcome list from one rule evaluation.
pub fn score_risk(outcomes: &[RuleOutcome]) -> RiskScore {
    let mut dimensions = RiskDimensions::default();
    for outcome in outcomes.iter().filter(|o| o.triggered) {
        dimensions.add(outcome.dimension, outcome.weight);
    }
    let score = dimensions.total().min(MAX_RISK_SCORE);
    RiskScore {
        score,
        dimensions,
        level: derive_risk_level(score),
    }
}

/// Apply every triggered rule's elevation to the score's derived level.
///
/// Returns the highest of the derived level and all elevations; elevation
/// never lowers the level.
pub fn elevated_level(score: &RiskScore, outcomes: &[RuleOutcome]) -> RiskLevel {
    outcomes
        .iter()
        .filter(|o| o.triggered)
        .filter_map(|o| o.risk_elevation)
        .fold(score.level, RiskLevel::elevate)
}

// ── Tests ──────────────────────────────────────────────────────────────
