//! Outcome types produced by detector rules.
//!
//! Every type here is a plain immutable value, created fresh per evaluation
//! and serialisable via serde so hosts can persist or transport assessments.

use serde::{Deserialize, Serialize};

use crate::risk::{RiskDimension, RiskLevel};

/// Whether a triggered rule blocks execution or merely advises.
///
/// Blocking rules represent contradictions or hazards that a host should
/// resolve with the user before dispatching the task; non-blocking rules
/// only contribute risk weight and clarifying material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    /// The rule surfaces a hazard that must be resolved before proceeding.
    Blocking,
    /// The rule is advisory only.
    NonBlocking,
}

/// Task category supplied by the caller alongside the text.
///
/// Detector rules may be scoped to a category via [`TaskScope`]; callers
/// that do not know the category pass [`TaskCategory::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// No specific category known.
    General,
    /// Programming and code-change tasks.
    Code,
    /// Prose and content-writing tasks.
    Writing,
    /// Research, evaluation, and data-analysis tasks.
    Analysis,
}

impl TaskCategory {
    /// Stable lowercase name used in routing rationales.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Code => "code",
            Self::Writing => "writing",
            Self::Analysis => "analysis",
        }
    }
}

/// Which task categories a rule applies to.
///
/// Rules scoped to a single category produce untriggered outcomes for
/// all other categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    /// The rule applies to every category.
    #[default]
    All,
    /// The rule applies only to [`TaskCategory::General`] tasks.
    General,
    /// The rule applies only to [`TaskCategory::Code`] tasks.
    Code,
    /// The rule applies only to [`TaskCategory::Writing`] tasks.
    Writing,
    /// The rule applies only to [`TaskCategory::Analysis`] tasks.
    Analysis,
}

impl TaskScope {
    /// Return `true` if a rule with this scope applies to `category`.
    pub fn applies_to(self, category: TaskCategory) -> bool {
        match self {
            Self::All => true,
            Self::General => category == TaskCategory::General,
            Self::Code => category == TaskCategory::Code,
            Self::Writing => category == TaskCategory::Writing,
            Self::Analysis => category == TaskCategory::Analysis,
        }
    }

    /// Stable lowercase name used in serialized rule definitions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::General => "general",
            Self::Code => "code",
            Self::Writing => "writing",
            Self::Analysis => "analysis",
        }
    }
}

/// Three-point grade used for assumption confidence and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Low grade.
    Low,
    /// Medium grade.
    Medium,
    /// High grade.
    High,
}

/// A clarifying question attached to a triggered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, matching the rule that produced it.
    pub id: String,
    /// The question text shown to the user.
    pub text: String,
    /// Why the engine is asking.
    pub reason: String,
    /// Whether the task should not proceed until answered.
    pub blocking: bool,
}

/// An assumption the engine would make if the task proceeds unclarified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assumption {
    /// Stable identifier, matching the rule that produced it.
    pub id: String,
    /// The assumption text.
    pub text: String,
    /// How confident the engine is that the assumption holds.
    pub confidence: Rating,
    /// How costly it is if the assumption turns out wrong.
    pub impact: Rating,
    /// Whether acting on the assumption can be undone cheaply.
    pub reversible: bool,
}

/// Result of evaluating one detector rule against the input.
///
/// One outcome is produced per rule, in catalog order, on every evaluation.
/// Outcomes are self-describing: they carry the rule's dimension and weight
/// so the risk scorer stays a pure function of its input even when custom
/// rules extend the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Identifier of the rule that produced this outcome.
    pub rule_name: String,
    /// Severity class of the rule.
    pub severity: RuleSeverity,
    /// Risk dimension this rule's weight accrues to.
    pub dimension: RiskDimension,
    /// Weight added to the dimension when triggered.
    pub weight: u32,
    /// Whether the rule matched the input.
    pub triggered: bool,
    /// Human-readable finding; empty when not triggered.
    pub message: String,
    /// Clarifying question, when the rule produces one.
    pub question: Option<Question>,
    /// Assumption the engine would proceed under, when the rule produces one.
    pub assumption: Option<Assumption>,
    /// Risk level this rule elevates the assessment to. Elevation only ever
    /// raises the effective level, never lowers it.
    pub risk_elevation: Option<RiskLevel>,
}

impl RuleOutcome {
    /// Build an untriggered outcome for a rule.
    pub(crate) fn untriggered(
        rule_name: &str,
        severity: RuleSeverity,
        dimension: RiskDimension,
        weight: u32,
    ) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            severity,
            dimension,
            weight,
            triggered: false,
            message: String::new(),
            question: None,
            assumption: None,
            risk_elevation: None,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
