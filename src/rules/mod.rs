//! Heuristic audit rules.
//!
//! Every category is a [`Rule`] backed by a static table of [`Check`]s. A
//! check is a predicate over a [`RuleContext`] plus a fixed deduction, a
//! message and a recommendation. [`Rule::evaluate`] walks the table in order,
//! starting from [`MAX_SCORE`] and subtracting the deduction of every check
//! that fires, so each category score can be explained finding by finding.
//!
//! | Category | Module |
//! |----------|--------|
//! | Frontmatter quality | [`frontmatter`] |
//! | Tool/permission safety | [`tool_safety`] |
//! | Instruction quality | [`instructions`] |
//! | Security posture | [`security`] |
//! | Documentation completeness | [`documentation`] |
//!
//! Use [`all_rules`] to obtain the registered rules and [`catalog`] to list
//! every rule ID known to the crate, including validator and consistency
//! rules.

pub mod documentation;
pub mod frontmatter;
pub mod instructions;
pub mod security;
pub mod tool_safety;

use crate::finding::{Category, Finding, Severity};
use crate::schema;
use serde_yaml::{Mapping, Value};

/// Ceiling every category score starts from.
pub const MAX_SCORE: f64 = 5.0;

/// One row of a rule table.
pub struct Check {
    pub id: &'static str,
    pub severity: Severity,
    /// Points subtracted from the category score when the check fires.
    pub deduction: f64,
    pub message: &'static str,
    pub recommendation: &'static str,
    /// Returns `true` when the deduction applies.
    pub applies: fn(&RuleContext<'_>) -> bool,
}

impl Check {
    fn to_finding(&self, category: Category) -> Finding {
        Finding::new(
            self.id,
            category,
            self.severity,
            self.message,
            Some(self.recommendation),
        )
    }
}

/// Score and findings of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResult {
    pub category: Category,
    pub score: f64,
    pub findings: Vec<Finding>,
}

/// A scored audit category.
///
/// Implementers are stateless and [`Send`] + [`Sync`] so that
/// [`audit::audit_document`](crate::audit::audit_document) can evaluate them
/// in parallel.
pub trait Rule: Send + Sync {
    fn category(&self) -> Category;

    /// One-line summary shown as the group header in `list-rules`.
    fn description(&self) -> &'static str;

    /// The ordered deduction table.
    fn checks(&self) -> &'static [Check];

    /// Applies every check in table order.
    ///
    /// The score is floored at `0.0` and rounded to two decimals.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> CategoryResult {
        let category = self.category();
        let mut score = MAX_SCORE;
        let mut findings = Vec::new();

        for check in self.checks() {
            if (check.applies)(ctx) {
                score -= check.deduction;
                findings.push(check.to_finding(category));
            }
        }

        tracing::debug!(
            category = category.as_str(),
            score,
            fired = findings.len(),
            "evaluated rule"
        );

        CategoryResult {
            category,
            score: round2(score.max(0.0)),
            findings,
        }
    }
}

/// Every registered rule, in [`Category::SCORED`] order.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(frontmatter::FrontmatterRule),
        Box::new(tool_safety::ToolSafetyRule),
        Box::new(instructions::InstructionRule),
        Box::new(security::SecurityRule),
        Box::new(documentation::DocumentationRule),
    ]
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read-only view of a document shared by every check.
///
/// Non-mapping `tools` or `permission` values are treated as empty so that
/// every predicate is total over arbitrary metadata.
pub struct RuleContext<'a> {
    pub metadata: &'a Mapping,
    pub body: &'a str,
    body_lower: String,
    tools: Option<&'a Mapping>,
    permission: Option<&'a Mapping>,
}

impl<'a> RuleContext<'a> {
    pub fn new(metadata: &'a Mapping, body: &'a str) -> Self {
        RuleContext {
            metadata,
            body,
            body_lower: body.to_lowercase(),
            tools: metadata.get("tools").and_then(Value::as_mapping),
            permission: metadata.get("permission").and_then(Value::as_mapping),
        }
    }

    /// The description when it is a non-empty string.
    pub fn description(&self) -> Option<&'a str> {
        self.metadata
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
    }

    /// `mode` is present, non-null, and not a valid execution mode.
    pub fn has_invalid_mode(&self) -> bool {
        match self.metadata.get("mode") {
            None | Some(Value::Null) => false,
            Some(Value::String(mode)) => !mode.is_empty() && !schema::is_execution_mode(mode),
            Some(Value::Bool(false)) => false,
            Some(_) => true,
        }
    }

    /// A capability counts as enabled only when set to boolean `true`.
    pub fn is_enabled(&self, capability: &str) -> bool {
        self.tools
            .and_then(|t| t.get(capability))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn enabled_count(&self) -> usize {
        self.tools
            .map(|t| t.values().filter(|v| v.as_bool() == Some(true)).count())
            .unwrap_or(0)
    }

    pub fn run_command_enabled(&self) -> bool {
        self.is_enabled(schema::RUN_COMMAND)
    }

    /// The `permission.bash` value, ignoring an explicit null.
    pub fn run_command_rule(&self) -> Option<&'a Value> {
        self.permission
            .and_then(|p| p.get(schema::RUN_COMMAND))
            .filter(|v| !v.is_null())
    }

    /// A run-command rule exists and is not an empty or false value.
    pub fn has_run_command_rule(&self) -> bool {
        self.run_command_rule().is_some_and(is_truthy)
    }

    /// The run-command pattern map, when the rule is a mapping.
    pub fn run_command_patterns(&self) -> Option<&'a Mapping> {
        self.run_command_rule().and_then(Value::as_mapping)
    }

    /// Number of run-command patterns set to `deny`.
    pub fn run_command_deny_count(&self) -> usize {
        self.run_command_patterns()
            .map(|p| {
                p.values()
                    .filter(|v| v.as_str() == Some("deny"))
                    .count()
            })
            .unwrap_or(0)
    }

    /// The wildcard (`*`) default of the run-command patterns.
    pub fn run_command_default(&self) -> Option<&'a str> {
        self.run_command_patterns()
            .and_then(|p| p.get("*"))
            .and_then(Value::as_str)
    }

    pub fn run_command_has_default(&self) -> bool {
        self.run_command_patterns()
            .is_some_and(|p| p.contains_key("*"))
    }

    /// Case-insensitive substring search over the body.
    ///
    /// `needle` must already be lowercase.
    pub fn body_mentions(&self, needle: &str) -> bool {
        self.body_lower.contains(needle)
    }

    pub fn body_mentions_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.body_mentions(n))
    }

    /// How many of `needles` appear in the body.
    pub fn body_mention_count(&self, needles: &[&str]) -> usize {
        needles.iter().filter(|n| self.body_mentions(n)).count()
    }

    /// Second-level heading lines (`## Title`) in the body.
    pub fn section_count(&self) -> usize {
        self.body
            .lines()
            .filter(|line| {
                line.strip_prefix("##").is_some_and(|rest| {
                    rest.starts_with(char::is_whitespace) && !rest.trim().is_empty()
                })
            })
            .count()
    }

    /// Number of code-fence delimiters (three backticks) in the body.
    pub fn fence_count(&self) -> usize {
        self.body.matches("```").count()
    }

    /// Lines in the body, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.body.split('\n').count()
    }
}

/// YAML truthiness: null, `false`, zero, and empty strings or collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        Value::Tagged(t) => is_truthy(&t.value),
    }
}

/// Metadata for a single rule, used by the `list-rules` and `explain` commands.
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"tools/bash-no-permission"`).
    pub id: &'static str,
    pub severity: Severity,
    /// Owning area: a category name, `"schema"` or `"consistency"`.
    pub group: &'static str,
    pub message: &'static str,
    pub remediation: &'static str,
    /// Score deduction, for heuristic rules only.
    pub deduction: Option<f64>,
}

/// Every rule known to the crate: heuristic, schema and consistency.
pub fn catalog() -> Vec<RuleInfo> {
    let mut rules: Vec<RuleInfo> = all_rules()
        .iter()
        .flat_map(|rule| {
            let group = rule.category().as_str();
            rule.checks().iter().map(move |c| RuleInfo {
                id: c.id,
                severity: c.severity,
                group,
                message: c.message,
                remediation: c.recommendation,
                deduction: Some(c.deduction),
            })
        })
        .collect();
    rules.extend(crate::validate::rules());
    rules.extend(crate::consistency::rules());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn truthiness_matches_yaml_intuition() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::String(String::new())));
        assert!(!is_truthy(&Value::Mapping(Mapping::new())));
        assert!(is_truthy(&Value::String("ask".into())));
    }

    #[test]
    fn non_boolean_tool_is_not_enabled() {
        let meta = mapping("tools:\n  bash: \"yes\"\n  read: true\n");
        let ctx = RuleContext::new(&meta, "");
        assert!(!ctx.is_enabled("bash"));
        assert!(ctx.is_enabled("read"));
        assert_eq!(ctx.enabled_count(), 1);
    }

    #[test]
    fn tools_as_list_is_treated_as_empty() {
        let meta = mapping("tools: [bash, read]\n");
        let ctx = RuleContext::new(&meta, "");
        assert_eq!(ctx.enabled_count(), 0);
        assert!(!ctx.run_command_enabled());
    }

    #[test]
    fn section_count_ignores_deeper_headings() {
        let meta = Mapping::new();
        let ctx = RuleContext::new(&meta, "## One\n### Sub\n##\n## Two\n#### Deep\n");
        assert_eq!(ctx.section_count(), 2);
    }

    #[test]
    fn round2_rounds_half_away() {
        assert_eq!(round2(4.199999999), 4.2);
        assert_eq!(round2(3.456), 3.46);
    }
}
