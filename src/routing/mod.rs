//! # Stage: Model Routing
//!
//! ## Responsibility
//! Turn `(complexity, risk, profile, sensitivities)` into a concrete model
//! recommendation: two-step tier selection, research-intent override,
//! provider/model lookup in a frozen 3×4 table, confidence and savings
//! computation, and a full `decision_path` audit trail.
//!
//! ## Guarantees
//! - Deterministic: the same routing input always produces the same
//!   recommendation, byte for byte.
//! - Auditable: every decision appends a `decision_path` entry in
//!   evaluation order; the entry format is part of the public contract.
//! - Total: every `(provider, tier)` pair has a catalog entry and a price;
//!   the fallback provider never equals the primary.
//!
//! ## NOT Responsible For
//! - Calling any model (the host owns transport)
//! - Computing risk or complexity (those arrive as inputs)
//! - Persisting recommendations (hosts serialize them as needed)

pub mod catalog;
pub mod cost;
pub mod router;

// Re-exports for convenience
pub use catalog::{
    fallback_provider, model_for, provider_for_target, ModelEntry, Provider, Tier,
    BASELINE_MODEL, RESEARCH_PROVIDER,
};
pub use cost::{
    estimate_cost, rate_for, savings_summary, savings_vs_baseline, CostEstimate, ModelRate,
    SavingsReport,
};
pub use router::{
    default_tier, detect_research_intent, route_model, FallbackModel, ModelRecommendation,
    PrimaryModel, RoutingInput,
};
