//! Frozen tier and provider catalog.
//!
//! Process-wide immutable static data: three capability tiers crossed with
//! four providers, each cell carrying a concrete model id, a default
//! temperature, and a max-token cap. No setters exist; callers cannot
//! mutate the table.

use serde::{Deserialize, Serialize};

/// Capability band used to select a model regardless of provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Cheap, fast models for simple factual work.
    Small,
    /// General-purpose workhorse models.
    Mid,
    /// Frontier models for multi-step and agentic work.
    Top,
}

impl Tier {
    /// Stable lowercase name used in decision paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Mid => "mid",
            Self::Top => "top",
        }
    }

    /// One-tier downgrade: `top → mid`, `mid → small`; `small` stays put.
    pub fn downgrade(self) -> Tier {
        match self {
            Self::Top => Self::Mid,
            Self::Mid | Self::Small => Self::Small,
        }
    }
}

/// The four fixed providers in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Anthropic Claude models.
    Anthropic,
    /// OpenAI GPT and o-series models.
    #[serde(rename = "openai")]
    OpenAi,
    /// Google Gemini models.
    Google,
    /// Perplexity Sonar models (research-oriented, live retrieval).
    Perplexity,
}

impl Provider {
    /// Stable lowercase name used in decision paths and recommendations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Perplexity => "perplexity",
        }
    }

    /// Every provider, in table order.
    pub fn all() -> [Provider; 4] {
        [Self::Anthropic, Self::OpenAi, Self::Google, Self::Perplexity]
    }
}

/// Provider forced by the research-intent override.
pub const RESEARCH_PROVIDER: Provider = Provider::Perplexity;

/// Fixed baseline model for savings comparisons. Deliberately a mid-tier
/// paid model so savings stay non-negative for most routes.
pub const BASELINE_MODEL: &str = "gpt-4o";

/// One cell of the tier/provider table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelEntry {
    /// Owning provider.
    pub provider: Provider,
    /// Concrete model id.
    pub model: &'static str,
    /// Default sampling temperature when no profile overrides it.
    pub default_temperature: f64,
    /// Hard cap on output tokens for this model.
    pub max_tokens_cap: u32,
}

const fn entry(
    provider: Provider,
    model: &'static str,
    default_temperature: f64,
    max_tokens_cap: u32,
) -> ModelEntry {
    ModelEntry {
        provider,
        model,
        default_temperature,
        max_tokens_cap,
    }
}

static ANTHROPIC_SMALL: ModelEntry = entry(Provider::Anthropic, "claude-3-5-haiku", 0.3, 4_096);
static ANTHROPIC_MID: ModelEntry = entry(Provider::Anthropic, "claude-sonnet-4", 0.5, 8_192);
static ANTHROPIC_TOP: ModelEntry = entry(Provider::Anthropic, "claude-opus-4", 0.7, 16_384);
static OPENAI_SMALL: ModelEntry = entry(Provider::OpenAi, "gpt-4o-mini", 0.3, 4_096);
static OPENAI_MID: ModelEntry = entry(Provider::OpenAi, "gpt-4o", 0.5, 8_192);
static OPENAI_TOP: ModelEntry = entry(Provider::OpenAi, "o1", 0.7, 16_384);
static GOOGLE_SMALL: ModelEntry = entry(Provider::Google, "gemini-2.0-flash-lite", 0.3, 4_096);
static GOOGLE_MID: ModelEntry = entry(Provider::Google, "gemini-2.0-flash", 0.5, 8_192);
static GOOGLE_TOP: ModelEntry = entry(Provider::Google, "gemini-2.5-pro", 0.7, 16_384);
static PERPLEXITY_SMALL: ModelEntry = entry(Provider::Perplexity, "sonar", 0.2, 4_096);
static PERPLEXITY_MID: ModelEntry = entry(Provider::Perplexity, "sonar-pro", 0.2, 8_192);
static PERPLEXITY_TOP: ModelEntry =
    entry(Provider::Perplexity, "sonar-reasoning-pro", 0.2, 16_384);

/// Look up the table cell for `(provider, tier)`.
///
/// Total: every combination has an entry.
pub fn model_for(provider: Provider, tier: Tier) -> &'static ModelEntry {
    match (provider, tier) {
        (Provider::Anthropic, Tier::Small) => &ANTHROPIC_SMALL,
        (Provider::Anthropic, Tier::Mid) => &ANTHROPIC_MID,
        (Provider::Anthropic, Tier::Top) => &ANTHROPIC_TOP,
        (Provider::OpenAi, Tier::Small) => &OPENAI_SMALL,
        (Provider::OpenAi, Tier::Mid) => &OPENAI_MID,
        (Provider::OpenAi, Tier::Top) => &OPENAI_TOP,
        (Provider::Google, Tier::Small) => &GOOGLE_SMALL,
        (Provider::Google, Tier::Mid) => &GOOGLE_MID,
        (Provider::Google, Tier::Top) => &GOOGLE_TOP,
        (Provider::Perplexity, Tier::Small) => &PERPLEXITY_SMALL,
        (Provider::Perplexity, Tier::Mid) => &PERPLEXITY_MID,
        (Provider::Perplexity, Tier::Top) => &PERPLEXITY_TOP,
    }
}

/// Map a caller-supplied target ecosystem to a provider.
///
/// Unknown or absent targets fall back to Anthropic. The research-intent
/// override takes precedence over this selection in the router.
pub fn provider_for_target(target: Option<&str>) -> Provider {
    match target.map(str::to_ascii_lowercase).as_deref() {
        Some("openai") | Some("gpt") => Provider::OpenAi,
        Some("google") | Some("gemini") => Provider::Google,
        Some("perplexity") | Some("research") => Provider::Perplexity,
        // "claude", "anthropic", "generic", unknown, or unset
        _ => Provider::Anthropic,
    }
}

/// Fallback provider for a primary: always a different one.
pub fn fallback_provider(primary: Provider) -> Provider {
    match primary {
        Provider::Anthropic => Provider::OpenAi,
        Provider::OpenAi | Provider::Google | Provider::Perplexity => Provider::Anthropic,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
