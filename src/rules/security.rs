//! Security posture: whether the instructions back up risky capabilities with
//! safety guidance.

use super::{Check, Rule, RuleContext};
use crate::finding::{Category, Severity};

/// Words that indicate a safety protocol around command execution.
pub const SAFETY_KEYWORDS: &[&str] = &[
    "safety", "confirm", "always", "never", "backup", "verify", "check",
];
pub const MIN_SAFETY_KEYWORDS: usize = 3;
pub const MIN_DENY_PATTERNS: usize = 2;

const SENSITIVE_DATA_KEYWORDS: &[&str] = &["secret", "password", "credential"];
const OVERWRITE_KEYWORDS: &[&str] = &["overwrite", "exist"];

static CHECKS: &[Check] = &[
    Check {
        id: "security/bash-few-safety-keywords",
        severity: Severity::Warning,
        deduction: 1.5,
        message: "bash enabled but few safety keywords in instructions",
        recommendation: "Add safety protocols: confirmation prompts, backup procedures",
        applies: bash_few_safety_keywords,
    },
    Check {
        id: "security/bash-few-deny-patterns",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Few deny patterns for bash",
        recommendation: "Add more deny patterns for dangerous commands",
        applies: bash_few_deny_patterns,
    },
    Check {
        id: "security/write-no-overwrite-guidance",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "write enabled but no overwrite safety mentioned",
        recommendation: "Add guidance on checking file existence before writing",
        applies: write_without_overwrite_guidance,
    },
    Check {
        id: "security/no-sensitive-data-guidance",
        severity: Severity::Info,
        deduction: 0.3,
        message: "No guidance on handling sensitive data",
        recommendation: "Add guidelines for handling secrets and credentials",
        applies: no_sensitive_data_guidance,
    },
];

fn bash_few_safety_keywords(ctx: &RuleContext<'_>) -> bool {
    ctx.run_command_enabled() && ctx.body_mention_count(SAFETY_KEYWORDS) < MIN_SAFETY_KEYWORDS
}

// A missing bash rule counts as an empty pattern map; a scalar rule is skipped.
fn bash_few_deny_patterns(ctx: &RuleContext<'_>) -> bool {
    if !ctx.run_command_enabled() {
        return false;
    }
    match ctx.run_command_rule() {
        None => true,
        Some(rule) if rule.is_mapping() => ctx.run_command_deny_count() < MIN_DENY_PATTERNS,
        Some(_) => false,
    }
}

fn write_without_overwrite_guidance(ctx: &RuleContext<'_>) -> bool {
    ctx.is_enabled("write") && !ctx.body_mentions_any(OVERWRITE_KEYWORDS)
}

fn no_sensitive_data_guidance(ctx: &RuleContext<'_>) -> bool {
    (ctx.is_enabled("read") || ctx.run_command_enabled())
        && !ctx.body_mentions_any(SENSITIVE_DATA_KEYWORDS)
}

pub struct SecurityRule;

impl Rule for SecurityRule {
    fn category(&self) -> Category {
        Category::Security
    }

    fn description(&self) -> &'static str {
        "Safety protocols, deny patterns, overwrite and secret-handling guidance"
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }
}
