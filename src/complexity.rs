//! Task complexity classification.
//!
//! ## Responsibility
//! Scan `(text, context)` and label the task with exactly one of six
//! complexity categories, a confidence in `[0, 100]`, and a list of stable
//! `"key=value"` evidence signals.
//!
//! ## Decision policy
//!
//! A priority cascade with guards; the first matching category wins:
//!
//! | Priority | Category              | Trigger                                          |
//! |----------|-----------------------|--------------------------------------------------|
//! | 1        | `long_context`        | context estimate > 5K tokens, or doc reference   |
//! | 2        | `agent_orchestration` | tool/plugin/pipeline/orchestration vocabulary    |
//! | 3        | `multi_step`          | ≥3 sequencing separators                         |
//! | 4        | `creative`            | ideation vocabulary, unless code artifacts       |
//! | 5        | `analytical`          | comparison/evaluation vocabulary                 |
//! | 6        | `simple_factual`      | default; confidence shrinks as input grows       |
//!
//! ## Guarantees
//! - Deterministic: identical input produces byte-identical output.
//! - Signals are alphabetically sorted and capped at ten entries.
//! - Pure: no shared state, safe to call concurrently.

use serde::{Deserialize, Serialize};

use crate::tokens::{TokenEstimator, WordCountEstimator};

/// Context token estimate above which a task is `long_context`.
pub const LONG_CONTEXT_TOKEN_THRESHOLD: u64 = 5_000;

/// Minimum number of sequencing separators for `multi_step`. Fewer must
/// not trigger the category, so two-clause sentences stay out.
pub const MULTI_STEP_MIN_SEPARATORS: usize = 3;

/// Maximum number of evidence signals reported per classification.
pub const MAX_SIGNALS: usize = 10;

/// The six task complexity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskComplexity {
    /// Short, single-clause factual question.
    SimpleFactual,
    /// Comparison, evaluation, or trade-off reasoning.
    Analytical,
    /// A sequence of three or more dependent steps.
    MultiStep,
    /// Open-ended ideation or fiction.
    Creative,
    /// Reasoning over a large supplied context.
    LongContext,
    /// Tool-using or multi-agent execution.
    AgentOrchestration,
}

impl TaskComplexity {
    /// Stable lowercase name used in signals and decision paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleFactual => "simple_factual",
            Self::Analytical => "analytical",
            Self::MultiStep => "multi_step",
            Self::Creative => "creative",
            Self::LongContext => "long_context",
            Self::AgentOrchestration => "agent_orchestration",
        }
    }

    /// Every category, in declaration order. Handy for exhaustive tests.
    pub fn all() -> [TaskComplexity; 6] {
        [
            Self::SimpleFactual,
            Self::Analytical,
            Self::MultiStep,
            Self::Creative,
            Self::LongContext,
            Self::AgentOrchestration,
        ]
    }
}

/// Result of one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityResult {
    /// The winning category.
    pub complexity: TaskComplexity,
    /// Confidence in `[0, 100]`.
    pub confidence: u32,
    /// Alphabetically sorted `"key=value"` evidence strings, at most ten.
    pub signals: Vec<String>,
}

/// Classify with the default word-count token estimator.
///
/// # Arguments
///
/// * `text` — The raw task description.
/// * `context` — Optional supplied context (documents, data, code).
pub fn classify_complexity(text: &str, context: Option<&str>) -> ComplexityResult {
    classify_complexity_with(&WordCountEstimator::new(), text, context)
}

/// Classify with an injected token estimator.
///
/// Hosts with a real tokenizer can pass their own [`TokenEstimator`]; the
/// cascade and signal contract are identical either way.
pub fn classify_complexity_with(
    estimator: &dyn TokenEstimator,
    text: &str,
    context: Option<&str>,
) -> ComplexityResult {
    let lower = text.to_lowercase();
    let context_tokens = context.map(|c| estimator.estimate(c)).unwrap_or(0);

    // 1. long_context
    let doc_reference = contains_any(&lower, DOC_REFERENCE_TERMS);
    if context_tokens > LONG_CONTEXT_TOKEN_THRESHOLD || doc_reference {
        let confidence = if context_tokens > LONG_CONTEXT_TOKEN_THRESHOLD {
            let over = (context_tokens - LONG_CONTEXT_TOKEN_THRESHOLD) / 1_000;
            (75 + over.min(20)) as u32
        } else {
            70
        };
        return result(
            TaskComplexity::LongContext,
            confidence,
            vec![
                format!("context_tokens={context_tokens}"),
                format!("doc_reference={doc_reference}"),
                format!("token_threshold={LONG_CONTEXT_TOKEN_THRESHOLD}"),
            ],
        );
    }

    // 2. agent_orchestration
    let code_artifacts = contains_any(&lower, CODE_ARTIFACT_TERMS);
    let orchestration_terms = count_distinct(&lower, ORCHESTRATION_TERMS);
    if orchestration_terms >= 2 || (orchestration_terms >= 1 && code_artifacts) {
        // Tool vocabulary plus code context strongly implies agentic
        // execution, so code artifacts raise confidence here.
        let mut confidence = (65 + 5 * orchestration_terms as u32).min(85);
        if code_artifacts {
            confidence = (confidence + 10).min(95);
        }
        return result(
            TaskComplexity::AgentOrchestration,
            confidence,
            vec![
                format!("code_artifacts={code_artifacts}"),
                format!("orchestration_terms={orchestration_terms}"),
            ],
        );
    }

    // 3. multi_step
    let numbered_items = count_numbered_items(text);
    let sequence_words = count_sequence_words(&lower);
    let separator_total = numbered_items + sequence_words;
    if separator_total >= MULTI_STEP_MIN_SEPARATORS {
        let extra = (separator_total - MULTI_STEP_MIN_SEPARATORS) as u32;
        return result(
            TaskComplexity::MultiStep,
            (70 + 5 * extra).min(90),
            vec![
                format!("numbered_items={numbered_items}"),
                format!("separator_total={separator_total}"),
                format!("sequence_words={sequence_words}"),
            ],
        );
    }

    // 4. creative — suppressed by code artifacts: a "creative" request
    // about a specific function is a code task, not creative writing.
    let creative_terms = count_distinct(&lower, CREATIVE_TERMS);
    if creative_terms >= 1 && !code_artifacts {
        return result(
            TaskComplexity::Creative,
            (70 + 5 * creative_terms as u32).min(85),
            vec![
                format!("code_artifacts={code_artifacts}"),
                format!("creative_terms={creative_terms}"),
            ],
        );
    }

    // 5. analytical
    let analytical_terms = count_distinct(&lower, ANALYTICAL_TERMS);
    if analytical_terms >= 1 {
        return result(
            TaskComplexity::Analytical,
            (65 + 5 * analytical_terms as u32).min(85),
            vec![format!("analytical_terms={analytical_terms}")],
        );
    }

    // 6. simple_factual
    let word_count = text.split_whitespace().count();
    let confidence = 95u32.saturating_sub(word_count as u32).max(50);
    let question = text.trim_end().ends_with('?');
    result(
        TaskComplexity::SimpleFactual,
        confidence,
        vec![
            format!("question={question}"),
            format!("word_count={word_count}"),
        ],
    )
}

/// Build a result with sorted, capped signals.
fn result(complexity: TaskComplexity, confidence: u32, mut signals: Vec<String>) -> ComplexityResult {
    signals.sort();
    signals.truncate(MAX_SIGNALS);
    ComplexityResult {
        complexity,
        confidence,
        signals,
    }
}

// ── Vocabulary ─────────────────────────────────────────────────────────

const DOC_REFERENCE_TERMS: &[&str] = &[
    "this document",
    "the document",
    "the attached",
    "the text above",
    "the above text",
    "the following document",
];

const ORCHESTRATION_TERMS: &[&str] = &[
    "tool", "plugin", "pipeline", "orchestrat", "agent", "workflow", "mcp server",
    "function call", "api call",
];

const CODE_ARTIFACT_TERMS: &[&str] = &[
    "```", "function", "fn ", "class ", "def ", "method", "variable", "refactor", "compile",
    "endpoint", ".rs", ".py", ".ts", ".js",
];

const CREATIVE_TERMS: &[&str] = &[
    "brainstorm", "imagine", "novel", "creative", "story", "poem", "invent", "fiction",
    "ideas for", "come up with",
];

const ANALYTICAL_TERMS: &[&str] = &[
    "compare", "versus", " vs ", "trade-off", "tradeoff", "pros and cons", "evaluate",
    "analyze", "analyse", "assess", "which is better", "difference between",
];

const SEQUENCE_WORDS: &[&str] = &[
    "first", "then", "next", "after that", "finally", "lastly", "afterwards",
];

// ── Scanning helpers ───────────────────────────────────────────────────

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn count_distinct(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack.contains(*n)).count()
}

/// Count `N.` step markers: one to three digits followed by a dot and
/// whitespace (or end of text), preceded by a whitespace boundary. Decimal
/// numbers like `3.14` do not count.
fn count_numbered_items(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut count = 0;
    let mut i = 0;
    while i < chars.len() {
        let at_boundary = i == 0 || chars[i - 1].is_whitespace();
        if at_boundary && chars[i].is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j < chars.len() && chars[j] == '.' {
                let after_ok = j + 1 >= chars.len() || chars[j + 1].is_whitespace();
                if after_ok && j - i <= 3 {
                    count += 1;
                }
            }
            i = j + 1;
            continue;
        }
        i += 1;
    }
    count
}

/// Count sequencing keywords as whole words (punctuation-insensitive).
fn count_sequence_words(lower: &str) -> usize {
    let normalized: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let padded = format!(" {normalized} ");
    SEQUENCE_WORDS
        .iter()
        .map(|w| padded.matches(&format!(" {w} ")).count())
        .sum()
}

// ── Tests ──────────────────────────────────────────────────────────────
