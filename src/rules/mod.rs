//! # Stage: Rule Engine
//!
//! ## Responsibility
//! Evaluate a fixed, ordered catalog of independent detector rules against
//! `(text, context, category)` and report one outcome per rule. Detectors
//! cover ambiguity, scope explosion, contradictory constraints, missing
//! grounding, and budget mismatches; custom rules extend the catalog from
//! externally authored TOML.
//!
//! ## Guarantees
//! - Deterministic: the same input against the same rule set always yields
//!   the same outcomes, in the same order.
//! - Independent: rules never read each other's results.
//! - Fault-tolerant: a custom rule with an uncompilable pattern is skipped
//!   and logged, never aborts the batch.
//!
//! ## NOT Responsible For
//! - Turning outcomes into a risk score (that belongs to `risk`)
//! - Classifying task complexity (that belongs to `complexity`)

mod catalog;
pub mod custom;
pub mod engine;
pub mod types;

// Re-exports for convenience
pub use custom::{CustomRuleSpec, RuleError, RuleSet, MAX_PATTERN_CHARS, WEIGHT_RANGE};
pub use engine::{evaluate_rules, RuleEngine};
pub use types::{
    Assumption, Question, Rating, RuleOutcome, RuleSeverity, TaskCategory, TaskScope,
};
