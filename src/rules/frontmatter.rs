//! Frontmatter quality: how well the description tells the runtime when to
//! invoke the agent, and whether the execution mode is usable.
//!
//! | ID | Deduction | Condition |
//! |----|-----------|-----------|
//! | `frontmatter/description-missing` | 2.0 | no description |
//! | `frontmatter/description-short` | 0.5 | description under 50 characters |
//! | `frontmatter/description-no-example` | 0.5 | no `<example>` block |
//! | `frontmatter/description-no-trigger` | 0.3 | no trigger phrase |
//! | `frontmatter/invalid-mode` | 0.5 | mode set but not a known mode |

use super::{Check, Rule, RuleContext};
use crate::finding::{Category, Severity};
use crate::schema::{EXAMPLE_MARKER, TRIGGER_PHRASES};

/// Descriptions shorter than this (in characters) lose points.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

static CHECKS: &[Check] = &[
    Check {
        id: "frontmatter/description-missing",
        severity: Severity::Error,
        deduction: 2.0,
        message: "Missing description",
        recommendation: "Add a description with triggers and examples",
        applies: description_missing,
    },
    Check {
        id: "frontmatter/description-short",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Description is too short",
        recommendation: "Add more detail to description including trigger conditions",
        applies: description_short,
    },
    Check {
        id: "frontmatter/description-no-example",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Description missing <example> blocks",
        recommendation: "Add <example> blocks showing typical usage",
        applies: description_without_example,
    },
    Check {
        id: "frontmatter/description-no-trigger",
        severity: Severity::Info,
        deduction: 0.3,
        message: "Description missing trigger keywords",
        recommendation: "Add 'Use when...' to clarify when to invoke agent",
        applies: description_without_trigger,
    },
    Check {
        id: "frontmatter/invalid-mode",
        severity: Severity::Error,
        deduction: 0.5,
        message: "Invalid mode",
        recommendation: "Mode must be 'primary', 'subagent', or 'all'",
        applies: invalid_mode,
    },
];

fn invalid_mode(ctx: &RuleContext<'_>) -> bool {
    ctx.has_invalid_mode()
}

fn description_missing(ctx: &RuleContext<'_>) -> bool {
    ctx.description().is_none()
}

fn description_short(ctx: &RuleContext<'_>) -> bool {
    ctx.description()
        .is_some_and(|d| d.chars().count() < MIN_DESCRIPTION_CHARS)
}

fn description_without_example(ctx: &RuleContext<'_>) -> bool {
    ctx.description().is_some_and(|d| !d.contains(EXAMPLE_MARKER))
}

fn description_without_trigger(ctx: &RuleContext<'_>) -> bool {
    ctx.description().is_some_and(|d| !has_trigger_phrase(d))
}

/// Case-insensitive search for any of the trigger phrases.
pub fn has_trigger_phrase(description: &str) -> bool {
    let lower = description.to_lowercase();
    TRIGGER_PHRASES.iter().any(|p| lower.contains(p))
}

pub struct FrontmatterRule;

impl Rule for FrontmatterRule {
    fn category(&self) -> Category {
        Category::FrontmatterQuality
    }

    fn description(&self) -> &'static str {
        "Description detail, examples, trigger phrases and execution mode"
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }
}
