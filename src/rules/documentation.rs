//! Documentation completeness.

use super::{Check, Rule, RuleContext};
use crate::finding::{Category, Severity};

static CHECKS: &[Check] = &[
    Check {
        id: "docs/missing-overview",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Missing Overview or introduction",
        recommendation: "Add Overview or introduction section",
        applies: missing_overview,
    },
    Check {
        id: "docs/missing-responsibilities",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Missing Core responsibilities",
        recommendation: "Add Core responsibilities section",
        applies: missing_responsibilities,
    },
    Check {
        id: "docs/missing-examples",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Missing Usage examples",
        recommendation: "Add Usage examples section",
        applies: missing_examples,
    },
    Check {
        id: "docs/missing-error-handling",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Missing Error handling",
        recommendation: "Add Error handling section",
        applies: missing_error_handling,
    },
    Check {
        id: "docs/missing-limitations",
        severity: Severity::Info,
        deduction: 0.3,
        message: "Limitations not clearly stated",
        recommendation: "Document what agent CANNOT do",
        applies: missing_limitations,
    },
];

fn missing_overview(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("overview")
}

fn missing_responsibilities(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("responsibilit")
}

fn missing_examples(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("example")
}

fn missing_error_handling(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("error")
}

fn missing_limitations(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions_any(&["limitation", "cannot"])
}

pub struct DocumentationRule;

impl Rule for DocumentationRule {
    fn category(&self) -> Category {
        Category::Documentation
    }

    fn description(&self) -> &'static str {
        "Overview, responsibilities, examples, error handling and limitations"
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }
}
