//! Built-in detector catalog.
//!
//! Sixteen independent, ordered detector rules expressed as data-driven
//! descriptors: `{id, severity, dimension, weight, scope, check}`. Adding a
//! rule is an addition to [`BUILTIN_RULES`], not an edit to control flow.
//!
//! Each check is a pure predicate over the lowercased input plus optional
//! context; rules never read each other's results. Matching is plain
//! substring scanning over the lowercased text, with one bounded-lookahead
//! detector for scope explosion.

use crate::risk::{RiskDimension, RiskLevel};

use super::types::{Assumption, Question, Rating, RuleSeverity, TaskScope};

/// Lookahead window, in characters, used by the scope-explosion rule to tie
/// a broad quantifier to a concrete target without matching across
/// unrelated clauses.
pub(crate) const SCOPE_LOOKAHEAD_CHARS: usize = 50;

/// Input view shared by every rule check. Category scoping happens in the
/// engine before a check runs, so checks only see text and context.
pub(crate) struct EvalInput<'a> {
    /// Lowercased task text.
    pub lower: &'a str,
    /// Optional grounding context supplied by the caller.
    pub context: Option<&'a str>,
}

impl EvalInput<'_> {
    /// `true` when no usable grounding context was supplied.
    fn context_missing(&self) -> bool {
        self.context.map(str::trim).unwrap_or("").is_empty()
    }
}

/// What a triggered rule reports.
pub(crate) struct RuleHit {
    pub message: String,
    pub question: Option<Question>,
    pub assumption: Option<Assumption>,
    pub risk_elevation: Option<RiskLevel>,
}

/// A single detector rule descriptor.
pub(crate) struct RuleDef {
    /// Stable snake_case identifier.
    pub id: &'static str,
    /// Severity class.
    pub severity: RuleSeverity,
    /// Dimension the weight accrues to.
    pub dimension: RiskDimension,
    /// Weight added when triggered.
    pub weight: u32,
    /// Task categories the rule applies to.
    pub scope: TaskScope,
    /// Pure predicate plus finding template.
    pub check: fn(&EvalInput<'_>) -> Option<RuleHit>,
}

/// The ordered built-in catalog.
pub(crate) static BUILTIN_RULES: &[RuleDef] = &[
    RuleDef {
        id: "ambiguous_pronouns",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Underspec,
        weight: 8,
        scope: TaskScope::All,
        check: check_ambiguous_pronouns,
    },
    RuleDef {
        id: "vague_verbs",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Underspec,
        weight: 10,
        scope: TaskScope::All,
        check: check_vague_verbs,
    },
    RuleDef {
        id: "missing_success_criteria",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Underspec,
        weight: 8,
        scope: TaskScope::All,
        check: check_missing_success_criteria,
    },
    RuleDef {
        id: "missing_output_format",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Underspec,
        weight: 6,
        scope: TaskScope::All,
        check: check_missing_output_format,
    },
    RuleDef {
        id: "scope_explosion",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Scope,
        weight: 12,
        scope: TaskScope::All,
        check: check_scope_explosion,
    },
    RuleDef {
        id: "unbounded_iteration",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Scope,
        weight: 8,
        scope: TaskScope::All,
        check: check_unbounded_iteration,
    },
    RuleDef {
        id: "multi_objective",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Scope,
        weight: 6,
        scope: TaskScope::All,
        check: check_multi_objective,
    },
    RuleDef {
        id: "conflicting_constraints",
        severity: RuleSeverity::Blocking,
        dimension: RiskDimension::Constraint,
        weight: 15,
        scope: TaskScope::All,
        check: check_conflicting_constraints,
    },
    RuleDef {
        id: "destructive_no_safety",
        severity: RuleSeverity::Blocking,
        dimension: RiskDimension::Constraint,
        weight: 18,
        scope: TaskScope::All,
        check: check_destructive_no_safety,
    },
    RuleDef {
        id: "implicit_authority",
        severity: RuleSeverity::Blocking,
        dimension: RiskDimension::Constraint,
        weight: 14,
        scope: TaskScope::All,
        check: check_implicit_authority,
    },
    RuleDef {
        id: "no_rollback_plan",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Constraint,
        weight: 8,
        scope: TaskScope::Code,
        check: check_no_rollback_plan,
    },
    RuleDef {
        id: "exact_data_no_context",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Hallucination,
        weight: 12,
        scope: TaskScope::All,
        check: check_exact_data_no_context,
    },
    RuleDef {
        id: "time_sensitive_no_date",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Hallucination,
        weight: 10,
        scope: TaskScope::All,
        check: check_time_sensitive_no_date,
    },
    RuleDef {
        id: "citation_no_sources",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Hallucination,
        weight: 8,
        scope: TaskScope::All,
        check: check_citation_no_sources,
    },
    RuleDef {
        id: "small_model_large_scope",
        severity: RuleSeverity::NonBlocking,
        dimension: RiskDimension::Constraint,
        weight: 6,
        scope: TaskScope::All,
        check: check_small_model_large_scope,
    },
    RuleDef {
        id: "secret_material",
        severity: RuleSeverity::Blocking,
        dimension: RiskDimension::Constraint,
        weight: 20,
        scope: TaskScope::All,
        check: check_secret_material,
    },
];

// ── Matching helpers ───────────────────────────────────────────────────

/// `true` if any needle occurs in the haystack.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Number of distinct needles that occur in the haystack.
fn count_distinct(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| haystack.contains(*n)).count()
}

/// Total occurrence count of all needles in the haystack.
fn count_occurrences(haystack: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| haystack.matches(n).count()).sum()
}

/// `true` if any trigger is followed, within `window` characters, by any
/// target. The window keeps a quantifier from pairing with a noun in an
/// unrelated clause further down the text.
fn lookahead_hit(haystack: &str, triggers: &[&str], targets: &[&str], window: usize) -> bool {
    for trigger in triggers {
        for (idx, matched) in haystack.match_indices(trigger) {
            let after = &haystack[idx + matched.len()..];
            let window_text: String = after.chars().take(window).collect();
            if targets.iter().any(|t| window_text.contains(t)) {
                return true;
            }
        }
    }
    false
}

fn question(id: &str, text: &str, reason: &str, blocking: bool) -> Option<Question> {
    Some(Question {
        id: id.to_string(),
        text: text.to_string(),
        reason: reason.to_string(),
        blocking,
    })
}

fn assumption(
    id: &str,
    text: &str,
    confidence: Rating,
    impact: Rating,
    reversible: bool,
) -> Option<Assumption> {
    Some(Assumption {
        id: id.to_string(),
        text: text.to_string(),
        confidence,
        impact,
        reversible,
    })
}

// ── Detectors ──────────────────────────────────────────────────────────

const AMBIGUOUS_REFS: &[&str] = &[
    " it ", " that ", " them ", " those ", " these ", " the thing ", " this thing ",
];

fn check_ambiguous_pronouns(input: &EvalInput<'_>) -> Option<RuleHit> {
    if count_distinct(input.lower, AMBIGUOUS_REFS) < 2 {
        return None;
    }
    Some(RuleHit {
        message: "The request uses several pronouns with no clear antecedent".into(),
        question: question(
            "ambiguous_pronouns",
            "Which concrete objects do 'it', 'that', or 'them' refer to?",
            "several references have no stated antecedent",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const VAGUE_VERBS: &[&str] = &[
    "improve", "optimize", "optimise", "enhance", "clean up", "make it better", "polish",
    "streamline", "fix up",
];
const CONCRETE_TARGETS: &[&str] = &[
    "%", "percent", "benchmark", "metric", "measur", "target", "threshold", "criteria",
    "from", "reduce", "latency", "faster than",
];

fn check_vague_verbs(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, VAGUE_VERBS) || contains_any(input.lower, CONCRETE_TARGETS) {
        return None;
    }
    Some(RuleHit {
        message: "An improvement verb appears without a measurable target".into(),
        question: question(
            "vague_verbs",
            "What measurable outcome would count as an improvement?",
            "verbs like 'improve' or 'optimize' have no stated target",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const ACTION_VERBS: &[&str] = &["build ", "create ", "implement ", "write ", "develop ", "add "];
const CRITERIA_MARKERS: &[&str] = &[
    "should", "must", "so that", "acceptance", "criteria", "until", "passing", "verify",
    "expected",
];

fn check_missing_success_criteria(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, ACTION_VERBS) || contains_any(input.lower, CRITERIA_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "The task asks to build something but states no success criteria".into(),
        question: question(
            "missing_success_criteria",
            "How will you know the result is correct and complete?",
            "no acceptance criteria accompany the build request",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const DELIVERABLE_TERMS: &[&str] = &[
    "report", "summary", "list of", "document", "write-up", "writeup", "overview",
];
const FORMAT_MARKERS: &[&str] = &[
    "markdown", "json", "csv", "html", "bullet", "table", "paragraph", "format", "slide",
];

fn check_missing_output_format(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, DELIVERABLE_TERMS) || contains_any(input.lower, FORMAT_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "A deliverable is requested without an output format".into(),
        question: None,
        assumption: assumption(
            "missing_output_format",
            "No output format was specified; a prose answer with headings will be produced.",
            Rating::Medium,
            Rating::Low,
            true,
        ),
        risk_elevation: None,
    })
}

const SCOPE_QUANTIFIERS: &[&str] = &["all ", "every ", "entire ", "everything in", "each of the"];
const SCOPE_TARGETS: &[&str] = &[
    "file", "module", "test", "function", "class", "component", "endpoint", "service", "page",
    "table", "repo", "codebase", "project", "document",
];

fn check_scope_explosion(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !lookahead_hit(
        input.lower,
        SCOPE_QUANTIFIERS,
        SCOPE_TARGETS,
        SCOPE_LOOKAHEAD_CHARS,
    ) {
        return None;
    }
    Some(RuleHit {
        message: "A broad quantifier covers a whole class of artifacts".into(),
        question: question(
            "scope_explosion",
            "Should the change really cover every matching artifact, or a specific subset?",
            "quantifiers like 'all' or 'entire' multiply the blast radius",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const UNBOUNDED_MARKERS: &[&str] = &[
    "keep trying", "until it works", "as many as possible", "as much as possible",
    "no matter how long", "indefinitely", "over and over",
];

fn check_unbounded_iteration(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, UNBOUNDED_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "The task has no stated stopping condition".into(),
        question: question(
            "unbounded_iteration",
            "What is the stopping condition for the loop this task implies?",
            "open-ended iteration was requested",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const OBJECTIVE_MARKERS: &[&str] = &[
    "also ", "additionally", "as well as", "on top of that", "while also",
];

fn check_multi_objective(input: &EvalInput<'_>) -> Option<RuleHit> {
    if count_occurrences(input.lower, OBJECTIVE_MARKERS) < 2 {
        return None;
    }
    Some(RuleHit {
        message: "The request bundles several distinct objectives".into(),
        question: question(
            "multi_objective",
            "Which of the bundled objectives has priority if they conflict?",
            "multiple additive objectives appear in one request",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const EXCLUSIVE_CONSTRAINTS: &[&str] = &[
    "only modify", "only change", "only touch", "only update", "nothing outside",
    "restrict changes to", "don't touch anything else",
];
const ADDITIVE_CHANGES: &[&str] = &[
    "also modify", "also change", "also update", "also touch", "and also change",
    "and also modify",
];

fn check_conflicting_constraints(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, EXCLUSIVE_CONSTRAINTS)
        || !contains_any(input.lower, ADDITIVE_CHANGES)
    {
        return None;
    }
    Some(RuleHit {
        message: "An exclusive scope constraint conflicts with an additional change request"
            .into(),
        question: question(
            "conflicting_constraints",
            "The request restricts changes to one area but also asks for changes elsewhere; which constraint wins?",
            "the stated scope constraints are mutually exclusive",
            true,
        ),
        assumption: None,
        risk_elevation: Some(RiskLevel::Medium),
    })
}

const DESTRUCTIVE_VERBS: &[&str] = &[
    "delete", "drop table", "drop the", "remove all", "truncate", "wipe", "erase", "purge",
    "rm -rf", "overwrite", "force push", "reset --hard",
];
const SAFETY_MARKERS: &[&str] = &[
    "backup", "back up", "dry run", "dry-run", "confirm", "snapshot", "archive", "only if",
    "after review", "except",
];

fn check_destructive_no_safety(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, DESTRUCTIVE_VERBS) || contains_any(input.lower, SAFETY_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "A destructive operation is requested with no stated safety constraint".into(),
        question: question(
            "destructive_no_safety",
            "Should a backup or dry run happen before the destructive step?",
            "destructive verbs appear with no safety constraint",
            true,
        ),
        assumption: None,
        risk_elevation: Some(RiskLevel::High),
    })
}

const OUTWARD_ACTIONS: &[&str] = &[
    "deploy", "push to production", "publish", "send the email", "send an email", "email the",
    "post to", "charge the", "notify all",
];
const APPROVAL_MARKERS: &[&str] = &[
    "after approval", "for review", "ask first", "confirm before", "staging", "draft",
    "do not send",
];

fn check_implicit_authority(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, OUTWARD_ACTIONS) || contains_any(input.lower, APPROVAL_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "An outward-facing action is requested without a confirmation step".into(),
        question: question(
            "implicit_authority",
            "Should this outward-facing action wait for explicit approval?",
            "the action affects systems or people outside the workspace",
            true,
        ),
        assumption: None,
        risk_elevation: Some(RiskLevel::Medium),
    })
}

const MIGRATION_TERMS: &[&str] = &[
    "migrate", "migration", "upgrade", "schema change", "cutover", "switch over",
];
const ROLLBACK_TERMS: &[&str] = &[
    "rollback", "roll back", "revert", "backout", "back out", "downgrade path",
];

fn check_no_rollback_plan(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, MIGRATION_TERMS) || contains_any(input.lower, ROLLBACK_TERMS) {
        return None;
    }
    Some(RuleHit {
        message: "A migration is requested with no rollback plan".into(),
        question: None,
        assumption: assumption(
            "no_rollback_plan",
            "No rollback plan was given; assuming the change can be reverted through version control.",
            Rating::Medium,
            Rating::High,
            false,
        ),
        risk_elevation: None,
    })
}

const EXACT_DATA_TERMS: &[&str] = &[
    "exact", "precise", "specific numbers", "statistics", "market share", "how many",
    "population of", "revenue of", "percentage of",
];

fn check_exact_data_no_context(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, EXACT_DATA_TERMS) || !input.context_missing() {
        return None;
    }
    Some(RuleHit {
        message: "Exact figures are requested but no source data was supplied".into(),
        question: question(
            "exact_data_no_context",
            "Which source should the exact figures come from?",
            "precise factual data was requested without grounding context",
            false,
        ),
        assumption: None,
        risk_elevation: Some(RiskLevel::Medium),
    })
}

const TIME_SENSITIVE_TERMS: &[&str] = &[
    "latest", "current", "most recent", "up-to-date", "up to date", "as of today", "this year",
    "newest",
];

fn check_time_sensitive_no_date(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, TIME_SENSITIVE_TERMS) || !input.context_missing() {
        return None;
    }
    Some(RuleHit {
        message: "The request needs current information but supplies no reference data".into(),
        question: None,
        assumption: assumption(
            "time_sensitive_no_date",
            "Answers about 'latest' or 'current' state will reflect the model's training cutoff.",
            Rating::High,
            Rating::Medium,
            true,
        ),
        risk_elevation: None,
    })
}

const CITATION_TERMS: &[&str] = &[
    "cite", "citation", "with sources", "reference list", "bibliography", "footnote",
];

fn check_citation_no_sources(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, CITATION_TERMS) || !input.context_missing() {
        return None;
    }
    Some(RuleHit {
        message: "Citations are requested but no source material was supplied".into(),
        question: question(
            "citation_no_sources",
            "Should sources be fetched externally or will they be provided?",
            "citations require source material the request does not include",
            false,
        ),
        assumption: None,
        risk_elevation: None,
    })
}

const SMALL_MODEL_NAMES: &[&str] = &[
    "haiku", "mini", "nano", "flash-lite", "8b model", "small model", "tiny model",
];
const LARGE_SCOPE_TERMS: &[&str] = &[
    "comprehensive", "exhaustive", "in-depth", "in depth", "detailed report", "full analysis",
    "entire", "thorough", "book-length", "complete guide",
];

fn check_small_model_large_scope(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, SMALL_MODEL_NAMES)
        || !contains_any(input.lower, LARGE_SCOPE_TERMS)
    {
        return None;
    }
    Some(RuleHit {
        message: "A small-capability model is named for a large-output task".into(),
        question: None,
        assumption: assumption(
            "small_model_large_scope",
            "The named small model may truncate or shallow out on this output scope.",
            Rating::High,
            Rating::Medium,
            true,
        ),
        risk_elevation: None,
    })
}

const SECRET_MARKERS: &[&str] = &[
    "api key", "api_key", "apikey", "password", "passwd", "secret key", "private key",
    "access token", "client secret", "-----begin",
];

fn check_secret_material(input: &EvalInput<'_>) -> Option<RuleHit> {
    if !contains_any(input.lower, SECRET_MARKERS) {
        return None;
    }
    Some(RuleHit {
        message: "The request appears to contain credential material".into(),
        question: question(
            "secret_material",
            "Credential-like material appears in the request. Remove or rotate it before proceeding?",
            "prompts should never carry live credentials",
            true,
        ),
        assumption: None,
        risk_elevation: Some(RiskLevel::High),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(lower: &'a str, context: Option<&'a str>) -> EvalInput<'a> {
        EvalInput { lower, context }
    }

    // -- catalog shape ---------------------------------------------------

    #[test]
    fn test_catalog_has_sixteen_rules() {
        assert_eq!(BUILTIN_RULES.len(), 16);
    }

    #[test]
    fn test_catalog_ids_unique_and_snake_case() {
        let mut seen = std::collections::HashSet::new();
        for rule in BUILTIN_RULES {
            assert!(seen.insert(rule.id), "duplicate rule id: {}", rule.id);
            assert!(
                rule.id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "rule id not snake_case: {}",
                rule.id
            );
        }
    }

    #[test]
    fn test_catalog_weights_in_schema_range() {
        for rule in BUILTIN_RULES {
            assert!(
                (1..=25).contains(&rule.weight),
                "rule {} weight {} out of [1,25]",
                rule.id,
                rule.weight
            );
        }
    }

    #[test]
    fn test_catalog_order_is_stable() {
        assert_eq!(BUILTIN_RULES[0].id, "ambiguous_pronouns");
        assert_eq!(BUILTIN_RULES[7].id, "conflicting_constraints");
        assert_eq!(BUILTIN_RULES[15].id, "secret_material");
    }

    // -- helpers ---------------------------------------------------------

    #[test]
    fn test_lookahead_hits_within_window() {
        assert!(lookahead_hit("rename all config files", &["all "], &["file"], 50));
    }

    #[test]
    fn test_lookahead_misses_outside_window() {
        let text = format!("first handle all of them, {} then the files", "x".repeat(60));
        assert!(!lookahead_hit(&text, &["all "], &["file"], 50));
    }

    // -- ambiguous pronouns ----------------------------------------------

    #[test]
    fn test_ambiguous_pronouns_two_refs_trigger() {
        let hit = check_ambiguous_pronouns(&input("take it and move that over", None));
        assert!(hit.is_some());
        let hit = hit.map(|h| h.question.is_some()).unwrap_or(false);
        assert!(hit, "should carry a clarifying question");
    }

    #[test]
    fn test_ambiguous_pronouns_single_ref_no_trigger() {
        assert!(check_ambiguous_pronouns(&input("please fix it now", None)).is_none());
    }

    // -- vague verbs -----------------------------------------------------

    #[test]
    fn test_vague_verb_without_target_triggers() {
        assert!(check_vague_verbs(&input("improve the onboarding flow", None)).is_some());
    }

    #[test]
    fn test_vague_verb_with_metric_no_trigger() {
        assert!(check_vague_verbs(
            &input("improve the onboarding flow to reduce drop-off by 20%", None)
        )
        .is_none());
    }

    // -- success criteria ------------------------------------------------

    #[test]
    fn test_build_without_criteria_triggers() {
        assert!(
            check_missing_success_criteria(&input("build a caching layer for the api", None))
                .is_some()
        );
    }

    #[test]
    fn test_build_with_criteria_no_trigger() {
        assert!(check_missing_success_criteria(&input(
            "build a caching layer so that p99 stays under 10ms",
            None
        ))
        .is_none());
    }

    // -- output format ---------------------------------------------------

    #[test]
    fn test_report_without_format_yields_assumption() {
        let hit = check_missing_output_format(&input("prepare a report on q3 churn", None));
        let has_assumption = hit.map(|h| h.assumption.is_some()).unwrap_or(false);
        assert!(has_assumption);
    }

    #[test]
    fn test_report_with_format_no_trigger() {
        assert!(check_missing_output_format(&input(
            "prepare a report on q3 churn as a markdown table",
            None
        ))
        .is_none());
    }

    // -- scope explosion -------------------------------------------------

    #[test]
    fn test_scope_explosion_quantifier_near_target_triggers() {
        assert!(check_scope_explosion(&input("update every test in the suite", None)).is_some());
    }

    #[test]
    fn test_scope_explosion_distant_target_no_trigger() {
        let text = format!(
            "first check all of the settings {} and later look at one file",
            "padding words here ".repeat(5)
        );
        assert!(check_scope_explosion(&input(&text, None)).is_none());
    }

    // -- unbounded iteration ---------------------------------------------

    #[test]
    fn test_unbounded_iteration_triggers() {
        assert!(
            check_unbounded_iteration(&input("keep trying until it works", None)).is_some()
        );
    }

    #[test]
    fn test_bounded_request_no_trigger() {
        assert!(check_unbounded_iteration(&input("retry at most three times", None)).is_none());
    }

    // -- multi objective -------------------------------------------------

    #[test]
    fn test_two_additive_markers_trigger() {
        assert!(check_multi_objective(&input(
            "refactor the parser, also add logging, and additionally update the docs",
            None
        ))
        .is_some());
    }

    #[test]
    fn test_single_additive_marker_no_trigger() {
        assert!(
            check_multi_objective(&input("refactor the parser and also add logging", None))
                .is_none()
        );
    }

    // -- conflicting constraints -----------------------------------------

    #[test]
    fn test_conflicting_constraints_blocking_question() {
        let hit = check_conflicting_constraints(&input(
            "only modify the auth module, but also update the billing code",
            None,
        ));
        let blocking = hit
            .and_then(|h| h.question)
            .map(|q| q.blocking)
            .unwrap_or(false);
        assert!(blocking, "conflict must produce a blocking question");
    }

    #[test]
    fn test_exclusive_constraint_alone_no_trigger() {
        assert!(
            check_conflicting_constraints(&input("only modify the auth module", None)).is_none()
        );
    }

    // -- destructive operations ------------------------------------------

    #[test]
    fn test_destructive_without_safety_elevates_high() {
        let hit = check_destructive_no_safety(&input("delete the staging database", None));
        let elevation = hit.and_then(|h| h.risk_elevation);
        assert_eq!(elevation, Some(RiskLevel::High));
    }

    #[test]
    fn test_destructive_with_backup_no_trigger() {
        assert!(check_destructive_no_safety(&input(
            "delete the staging database after taking a backup",
            None
        ))
        .is_none());
    }

    // -- implicit authority ----------------------------------------------

    #[test]
    fn test_deploy_without_approval_triggers_blocking() {
        let hit = check_implicit_authority(&input("deploy the new build to customers", None));
        let blocking = hit
            .and_then(|h| h.question)
            .map(|q| q.blocking)
            .unwrap_or(false);
        assert!(blocking);
    }

    #[test]
    fn test_deploy_to_staging_no_trigger() {
        assert!(check_implicit_authority(&input("deploy the new build to staging", None)).is_none());
    }

    // -- rollback plan ---------------------------------------------------

    #[test]
    fn test_migration_without_rollback_yields_assumption() {
        let hit = check_no_rollback_plan(&input("migrate the users table to the new schema", None));
        let irreversible = hit
            .and_then(|h| h.assumption)
            .map(|a| !a.reversible)
            .unwrap_or(false);
        assert!(irreversible, "the assumption should be marked irreversible");
    }

    #[test]
    fn test_migration_with_rollback_no_trigger() {
        assert!(check_no_rollback_plan(&input(
            "migrate the users table and document the rollback steps",
            None
        ))
        .is_none());
    }

    // -- grounding rules -------------------------------------------------

    #[test]
    fn test_exact_data_without_context_elevates_medium() {
        let hit = check_exact_data_no_context(&input(
            "give me the exact market share numbers for 2024",
            None,
        ));
        assert_eq!(hit.and_then(|h| h.risk_elevation), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_exact_data_with_context_no_trigger() {
        assert!(check_exact_data_no_context(&input(
            "give me the exact market share numbers for 2024",
            Some("market data: vendor a 34%, vendor b 22%")
        ))
        .is_none());
    }

    #[test]
    fn test_exact_data_blank_context_counts_as_missing() {
        assert!(check_exact_data_no_context(&input(
            "give me the exact market share numbers",
            Some("   ")
        ))
        .is_some());
    }

    #[test]
    fn test_time_sensitive_without_context_yields_assumption() {
        let hit = check_time_sensitive_no_date(&input("summarize the latest security news", None));
        let has_assumption = hit.map(|h| h.assumption.is_some()).unwrap_or(false);
        assert!(has_assumption);
    }

    #[test]
    fn test_citation_without_sources_triggers() {
        assert!(check_citation_no_sources(&input(
            "explain quantum tunneling with sources",
            None
        ))
        .is_some());
    }

    #[test]
    fn test_citation_with_context_no_trigger() {
        assert!(check_citation_no_sources(&input(
            "explain quantum tunneling with sources",
            Some("source: griffiths, introduction to quantum mechanics, ch. 8")
        ))
        .is_none());
    }

    // -- budget mismatch -------------------------------------------------

    #[test]
    fn test_small_model_large_scope_yields_truncation_assumption() {
        let hit = check_small_model_large_scope(&input(
            "use haiku to write a comprehensive guide to kubernetes",
            None,
        ));
        let has_assumption = hit.map(|h| h.assumption.is_some()).unwrap_or(false);
        assert!(has_assumption);
    }

    #[test]
    fn test_small_model_small_scope_no_trigger() {
        assert!(check_small_model_large_scope(&input(
            "use haiku to summarize this paragraph",
            None
        ))
        .is_none());
    }

    // -- secrets ---------------------------------------------------------

    #[test]
    fn test_secret_material_triggers_blocking_high() {
        let hit = check_secret_material(&input("here is my api key: sk-abc123, use it", None));
        let hit = hit.unwrap_or_else(|| {
            std::panic::panic_any("secret material should trigger".to_string())
        });
        assert_eq!(hit.risk_elevation, Some(RiskLevel::High));
        assert!(hit.question.map(|q| q.blocking).unwrap_or(false));
    }

    #[test]
    fn test_plain_request_no_secret_trigger() {
        assert!(check_secret_material(&input("write a haiku about autumn", None)).is_none());
    }
}
