//! Externally authored rule definitions.
//!
//! ## Responsibility
//! Parse custom rule specs from TOML, validate them against the schema,
//! merge them with the built-in catalog in a deterministic order, and
//! fingerprint the merged set for audit/drift detection.
//!
//! ## Guarantees
//! - Validation collects *all* errors before returning (no short-circuit)
//! - Error messages include the rule id, field, and invalid value
//! - Valid specs are sorted by id before merging, so load order never
//!   affects evaluation order or the fingerprint
//!
//! ## NOT Responsible For
//! - File I/O (hosts read the TOML and hand the string over)
//! - Pattern compilation (that happens per-rule at evaluation time; a
//!   pattern that fails to compile is skipped and logged, never fatal)

use serde::{Deserialize, Serialize};

use crate::risk::{RiskDimension, RiskLevel};

use super::catalog::BUILTIN_RULES;
use super::types::{RuleSeverity, TaskScope};

/// Maximum allowed pattern length, in characters.
pub const MAX_PATTERN_CHARS: usize = 500;

/// Allowed weight range for custom rules.
pub const WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=25;

/// An externally authored detector rule.
///
/// Patterns are regular expressions matched against the raw task text. An
/// optional `negative_pattern` suppresses a trigger when it also matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRuleSpec {
    /// Stable snake_case identifier; must not collide with a built-in rule.
    pub id: String,
    /// Severity class.
    pub severity: RuleSeverity,
    /// Risk dimension the weight accrues to.
    pub dimension: RiskDimension,
    /// Weight in `[1, 25]`.
    pub weight: u32,
    /// Task categories the rule applies to. Defaults to all.
    #[serde(default)]
    pub applies_to: TaskScope,
    /// Trigger pattern (regular expression, at most 500 characters).
    pub pattern: String,
    /// Optional suppression pattern; a match cancels the trigger.
    #[serde(default)]
    pub negative_pattern: Option<String>,
    /// Finding message reported when the rule triggers.
    pub message: String,
    /// Optional risk level the rule elevates the assessment to.
    #[serde(default)]
    pub risk_elevation: Option<RiskLevel>,
}

/// TOML envelope for rule definition files: a list of `[[rule]]` tables.
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<CustomRuleSpec>,
}

/// Errors arising from parsing or validating custom rule definitions.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The TOML could not be parsed at all.
    #[error("parse error in rule definitions: {source}")]
    Parse {
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// A specific field of a specific rule violates the schema.
    #[error("rule '{rule_id}': field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        /// Identifier of the offending rule (or its list position when the
        /// id itself is unusable).
        rule_id: String,
        /// Field name within the rule definition.
        field: String,
        /// String representation of the invalid value.
        value: String,
        /// Human-readable explanation of the constraint.
        reason: String,
    },
}

/// The merged rule set the engine evaluates: built-ins in catalog order
/// followed by validated custom rules sorted by id.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    custom: Vec<CustomRuleSpec>,
}

impl RuleSet {
    /// Rule set containing only the built-in catalog.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Validate `specs` and build a merged rule set.
    ///
    /// Collects every violation across every spec before returning, so a
    /// host sees the full scope of issues at once. Valid specs are sorted
    /// by id.
    ///
    /// # Errors
    ///
    /// Returns every [`RuleError::InvalidField`] found, one per violated
    /// constraint.
    pub fn with_custom_rules(specs: Vec<CustomRuleSpec>) -> Result<Self, Vec<RuleError>> {
        let mut errors = Vec::new();
        for (position, spec) in specs.iter().enumerate() {
            validate_spec(spec, position, &mut errors);
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.id.as_str()) {
                errors.push(RuleError::InvalidField {
                    rule_id: spec.id.clone(),
                    field: "id".into(),
                    value: spec.id.clone(),
                    reason: "duplicate custom rule id".into(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut custom = specs;
        custom.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { custom })
    }

    /// Parse a TOML rule definition file and build a merged rule set.
    ///
    /// # Errors
    ///
    /// A single [`RuleError::Parse`] if the TOML is unreadable, otherwise
    /// the itemized validation errors from [`RuleSet::with_custom_rules`].
    pub fn from_toml_str(toml_text: &str) -> Result<Self, Vec<RuleError>> {
        let file: RuleFile =
            toml::from_str(toml_text).map_err(|source| vec![RuleError::Parse { source }])?;
        Self::with_custom_rules(file.rule)
    }

    /// The validated custom rules, sorted by id.
    pub fn custom_rules(&self) -> &[CustomRuleSpec] {
        &self.custom
    }

    /// Number of custom rules in the set.
    pub fn custom_len(&self) -> usize {
        self.custom.len()
    }

    /// Stable fingerprint of the merged rule set.
    ///
    /// Every field of every rule (built-in and custom) is serialized in a
    /// fixed key order and hashed with FNV-1a 64. Two processes holding the
    /// same rule set always compute the same fingerprint, so hosts can
    /// detect configuration drift across replicas.
    pub fn fingerprint(&self) -> String {
        let mut canonical = String::new();
        for rule in BUILTIN_RULES {
            canonical.push_str(&format!(
                "applies_to={};dimension={};id={};severity={:?};weight={}\n",
                rule.scope.as_str(),
                rule.dimension.as_str(),
                rule.id,
                rule.severity,
                rule.weight,
            ));
        }
        for rule in &self.custom {
            canonical.push_str(&format!(
                "applies_to={};dimension={};id={};message={};negative_pattern={};pattern={};risk_elevation={};severity={:?};weight={}\n",
                rule.applies_to.as_str(),
                rule.dimension.as_str(),
                rule.id,
                rule.message,
                rule.negative_pattern.as_deref().unwrap_or(""),
                rule.pattern,
                rule.risk_elevation.map(RiskLevel::as_str).unwrap_or(""),
                rule.severity,
                rule.weight,
            ));
        }
        format!("{:016x}", fnv1a64(canonical.as_bytes()))
    }
}

/// Validate one spec, appending every violation to `errors`.
fn validate_spec(spec: &CustomRuleSpec, position: usize, errors: &mut Vec<RuleError>) {
    let rule_id = if spec.id.is_empty() {
        format!("#{position}")
    } else {
        spec.id.clone()
    };

    let snake_case = !spec.id.is_empty()
        && spec.id.chars().next().map(|c| c.is_ascii_lowercase()).unwrap_or(false)
        && spec
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !snake_case {
        errors.push(RuleError::InvalidField {
            rule_id: rule_id.clone(),
            field: "id".into(),
            value: spec.id.clone(),
            reason: "must be a non-empty snake_case identifier".into(),
        });
    }

    if BUILTIN_RULES.iter().any(|r| r.id == spec.id) {
        errors.push(RuleError::InvalidField {
            rule_id: rule_id.clone(),
            field: "id".into(),
            value: spec.id.clone(),
            reason: "collides with a built-in rule".into(),
        });
    }

    if !WEIGHT_RANGE.contains(&spec.weight) {
        errors.push(RuleError::InvalidField {
            rule_id: rule_id.clone(),
            field: "weight".into(),
            value: spec.weight.to_string(),
            reason: "must be in [1, 25]".into(),
        });
    }

    if spec.pattern.trim().is_empty() {
        errors.push(RuleError::InvalidField {
            rule_id: rule_id.clone(),
            field: "pattern".into(),
            value: String::new(),
            reason: "pattern must not be empty".into(),
        });
    } else if spec.pattern.chars().count() > MAX_PATTERN_CHARS {
        errors.push(RuleError::InvalidField {
            rule_id: rule_id.clone(),
            field: "pattern".into(),
            value: format!("{} chars", spec.pattern.chars().count()),
            reason: format!("pattern must be at most {MAX_PATTERN_CHARS} characters"),
        });
    }

    if let Some(negative) = &spec.negative_pattern {
        if negative.trim().is_empty() {
            errors.push(RuleError::InvalidField {
                rule_id: rule_id.clone(),
                field: "negative_pattern".into(),
                value: String::new(),
                reason: "negative_pattern must not be empty when present".into(),
            });
        } else if negative.chars().count() > MAX_PATTERN_CHARS {
            errors.push(RuleError::InvalidField {
                rule_id,
                field: "negative_pattern".into(),
                value: format!("{} chars", negative.chars().count()),
                reason: format!("negative_pattern must be at most {MAX_PATTERN_CHARS} characters"),
            });
        }
    }

    if spec.message.trim().is_empty() {
        errors.push(RuleError::InvalidField {
            rule_id: if spec.id.is_empty() {
                format!("#{position}")
            } else {
                spec.id.clone()
            },
            field: "message".into(),
            value: String::new(),
            reason: "message must not be empty".into(),
        });
    }
}

/// FNV-1a 64-bit hash. Chosen over the standard hasher because the result
/// must be stable across processes and toolchain versions.
fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_spec() -> CustomRuleSpec {
        CustomRuleSpec {
            id: "mentions_prod_db".into(),
            severity: RuleSeverity::NonBlocking,
            dimension: RiskDimension::Constraint,
            weight: 10,
            applies_to: TaskScope::All,
            pattern: r"(?i)\bprod(uction)? database\b".into(),
            negative_pattern: None,
            message: "The request touches the production database".into(),
            risk_elevation: None,
        }
    }

    // -- validation ------------------------------------------------------

    #[test]
    fn test_valid_spec_accepted() {
        let set = RuleSet::with_custom_rules(vec![valid_spec()]);
        assert!(set.is_ok());
        let set = set.unwrap_or_default();
        assert_eq!(set.custom_len(), 1);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut spec = valid_spec();
        spec.id = String::new();
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "id")
        }));
    }

    #[test]
    fn test_camel_case_id_rejected() {
        let mut spec = valid_spec();
        spec.id = "MentionsProdDb".into();
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, reason, .. }
                if field == "id" && reason.contains("snake_case"))
        }));
    }

    #[test]
    fn test_builtin_collision_rejected() {
        let mut spec = valid_spec();
        spec.id = "vague_verbs".into();
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { reason, .. } if reason.contains("built-in"))
        }));
    }

    #[test]
    fn test_weight_zero_rejected() {
        let mut spec = valid_spec();
        spec.weight = 0;
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "weight")
        }));
    }

    #[test]
    fn test_weight_26_rejected() {
        let mut spec = valid_spec();
        spec.weight = 26;
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "weight")
        }));
    }

    #[test]
    fn test_weight_bounds_accepted() {
        for weight in [1, 25] {
            let mut spec = valid_spec();
            spec.weight = weight;
            assert!(RuleSet::with_custom_rules(vec![spec]).is_ok(), "weight {weight}");
        }
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut spec = valid_spec();
        spec.pattern = "  ".into();
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "pattern")
        }));
    }

    #[test]
    fn test_oversized_pattern_rejected() {
        let mut spec = valid_spec();
        spec.pattern = "a".repeat(MAX_PATTERN_CHARS + 1);
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "pattern")
        }));
    }

    #[test]
    fn test_pattern_at_limit_accepted() {
        let mut spec = valid_spec();
        spec.pattern = "a".repeat(MAX_PATTERN_CHARS);
        assert!(RuleSet::with_custom_rules(vec![spec]).is_ok());
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut spec = valid_spec();
        spec.message = String::new();
        let errors = RuleSet::with_custom_rules(vec![spec]).err().unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { field, .. } if field == "message")
        }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let errors = RuleSet::with_custom_rules(vec![valid_spec(), valid_spec()])
            .err()
            .unwrap_or_default();
        assert!(errors.iter().any(|e| {
            matches!(e, RuleError::InvalidField { reason, .. } if reason.contains("duplicate"))
        }));
    }

    #[test]
    fn test_validation_collects_multiple_errors() {
        let mut bad = valid_spec();
        bad.id = "Bad Id".into();
        bad.weight = 0;
        bad.pattern = String::new();
        bad.message = String::new();
        let errors = RuleSet::with_custom_rules(vec![bad]).err().unwrap_or_default();
        assert!(errors.len() >= 4, "expected >=4 errors, got {}", errors.len());
    }

    // -- sorting ---------------------------------------------------------

    #[test]
    fn test_custom_rules_sorted_by_id() {
        let mut zeta = valid_spec();
        zeta.id = "zeta_rule".into();
        let mut alpha = valid_spec();
        alpha.id = "alpha_rule".into();
        let set = RuleSet::with_custom_rules(vec![zeta, alpha]).unwrap_or_default();
        let ids: Vec<_> = set.custom_rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha_rule", "zeta_rule"]);
    }

    // -- TOML loading ----------------------------------------------------

    #[test]
    fn test_from_toml_str_parses_rules() {
        let toml_text = r#"
            [[rule]]
            id = "mentions_kubernetes"
            severity = "non_blocking"
            dimension = "scope"
            weight = 5
            pattern = '(?i)\bkubernetes\b'
            message = "The request involves cluster infrastructure"

            [[rule]]
            id = "asks_for_legal_advice"
            severity = "blocking"
            dimension = "constraint"
            weight = 12
            applies_to = "writing"
            pattern = '(?i)\blegal advice\b'
            negative_pattern = '(?i)\bnot legal advice\b'
            message = "The request asks for legal advice"
            risk_elevation = "medium"
        "#;
        let set = RuleSet::from_toml_str(toml_text).unwrap_or_default();
        assert_eq!(set.custom_len(), 2);
        // Sorted by id: asks_for_legal_advice before mentions_kubernetes.
        assert_eq!(set.custom_rules()[0].id, "asks_for_legal_advice");
        assert_eq!(set.custom_rules()[0].applies_to, TaskScope::Writing);
        assert_eq!(
            set.custom_rules()[0].risk_elevation,
            Some(crate::risk::RiskLevel::Medium)
        );
    }

    #[test]
    fn test_from_toml_str_unparseable_returns_parse_error() {
        let errors = RuleSet::from_toml_str("not [[ valid toml").err().unwrap_or_default();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], RuleError::Parse { .. }));
    }

    #[test]
    fn test_from_toml_str_bad_enum_is_parse_error() {
        let toml_text = r#"
            [[rule]]
            id = "bad_severity"
            severity = "fatal"
            dimension = "scope"
            weight = 5
            pattern = "x"
            message = "m"
        "#;
        let errors = RuleSet::from_toml_str(toml_text).err().unwrap_or_default();
        assert!(matches!(errors[0], RuleError::Parse { .. }));
    }

    #[test]
    fn test_from_toml_str_empty_file_is_builtin_only() {
        let set = RuleSet::from_toml_str("").unwrap_or_default();
        assert_eq!(set.custom_len(), 0);
    }

    // -- fingerprint -----------------------------------------------------

    #[test]
    fn test_fingerprint_stable_across_calls() {
        let set = RuleSet::builtin();
        assert_eq!(set.fingerprint(), set.fingerprint());
    }

    #[test]
    fn test_fingerprint_independent_of_load_order() {
        let mut a = valid_spec();
        a.id = "alpha_rule".into();
        let mut z = valid_spec();
        z.id = "zeta_rule".into();
        let forward = RuleSet::with_custom_rules(vec![a.clone(), z.clone()]).unwrap_or_default();
        let reverse = RuleSet::with_custom_rules(vec![z, a]).unwrap_or_default();
        assert_eq!(forward.fingerprint(), reverse.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_rule_content() {
        let base = RuleSet::with_custom_rules(vec![valid_spec()]).unwrap_or_default();
        let mut tweaked_spec = valid_spec();
        tweaked_spec.weight = 11;
        let tweaked = RuleSet::with_custom_rules(vec![tweaked_spec]).unwrap_or_default();
        assert_ne!(base.fingerprint(), tweaked.fingerprint());
    }

    #[test]
    fn test_fingerprint_differs_between_builtin_and_extended() {
        let builtin = RuleSet::builtin();
        let extended = RuleSet::with_custom_rules(vec![valid_spec()]).unwrap_or_default();
        assert_ne!(builtin.fingerprint(), extended.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_16_hex_chars() {
        let fp = RuleSet::builtin().fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    // -- error display ---------------------------------------------------

    #[test]
    fn test_invalid_field_display_names_rule_and_field() {
        let err = RuleError::InvalidField {
            rule_id: "my_rule".into(),
            field: "weight".into(),
            value: "99".into(),
            reason: "must be in [1, 25]".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("my_rule"));
        assert!(msg.contains("weight"));
        assert!(msg.contains("99"));
    }
}
