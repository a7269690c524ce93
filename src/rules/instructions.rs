//! Instruction quality: structure, examples and length of the body.

use super::{Check, Rule, RuleContext};
use crate::finding::{Category, Severity};

pub const MIN_SECTIONS: usize = 3;
/// Two complete fenced blocks.
pub const MIN_FENCES: usize = 4;
pub const MIN_LINES: usize = 50;

static CHECKS: &[Check] = &[
    Check {
        id: "instructions/few-sections",
        severity: Severity::Warning,
        deduction: 1.0,
        message: "Few sections in instructions",
        recommendation: "Organize instructions with clear ## headings",
        applies: few_sections,
    },
    Check {
        id: "instructions/few-code-examples",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Few code examples",
        recommendation: "Add more code/command examples",
        applies: few_code_examples,
    },
    Check {
        id: "instructions/no-workflow",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "No workflow section found",
        recommendation: "Add a Workflow section with step-by-step process",
        applies: no_workflow,
    },
    Check {
        id: "instructions/no-responsibilities",
        severity: Severity::Info,
        deduction: 0.3,
        message: "No responsibilities section found",
        recommendation: "Add Core Responsibilities section",
        applies: no_responsibilities,
    },
    Check {
        id: "instructions/too-short",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "Instructions are quite short",
        recommendation: "Add more comprehensive guidance and examples",
        applies: too_short,
    },
];

fn few_sections(ctx: &RuleContext<'_>) -> bool {
    ctx.section_count() < MIN_SECTIONS
}

fn few_code_examples(ctx: &RuleContext<'_>) -> bool {
    ctx.fence_count() < MIN_FENCES
}

fn no_workflow(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("workflow")
}

fn no_responsibilities(ctx: &RuleContext<'_>) -> bool {
    !ctx.body_mentions("responsibilit")
}

fn too_short(ctx: &RuleContext<'_>) -> bool {
    ctx.line_count() < MIN_LINES
}

pub struct InstructionRule;

impl Rule for InstructionRule {
    fn category(&self) -> Category {
        Category::InstructionQuality
    }

    fn description(&self) -> &'static str {
        "Section structure, code examples, workflow and instruction length"
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }
}
