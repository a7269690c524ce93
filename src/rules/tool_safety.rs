//! Tool and permission safety: least privilege and run-command guard rails.

use super::{Check, Rule, RuleContext};
use crate::finding::{Category, Severity};

/// Enabling this many capabilities or more signals a kitchen-sink agent.
pub const MANY_TOOLS_THRESHOLD: usize = 9;

static CHECKS: &[Check] = &[
    Check {
        id: "tools/many-enabled",
        severity: Severity::Warning,
        deduction: 1.0,
        message: "Many tools enabled",
        recommendation: "Review if all tools are necessary - apply least privilege",
        applies: many_enabled,
    },
    Check {
        id: "tools/bash-no-permission",
        severity: Severity::Error,
        deduction: 1.5,
        message: "bash enabled but no permission patterns defined",
        recommendation: "Add permission patterns for bash commands",
        applies: bash_without_permission,
    },
    Check {
        id: "tools/bash-no-deny",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "No deny rules for dangerous bash commands",
        recommendation: "Add deny rules for rm -rf, dd, mkfs, etc.",
        applies: bash_without_deny,
    },
    Check {
        id: "tools/bash-no-default",
        severity: Severity::Info,
        deduction: 0.3,
        message: "No default (*) bash permission rule",
        recommendation: "Add '*': ask as default bash permission",
        applies: bash_without_default,
    },
    Check {
        id: "tools/write-without-read",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "write enabled without read",
        recommendation: "Add read tool (agent should read before writing)",
        applies: write_without_read,
    },
    Check {
        id: "tools/edit-without-read",
        severity: Severity::Warning,
        deduction: 0.5,
        message: "edit enabled without read",
        recommendation: "Add read tool (agent must read before editing)",
        applies: edit_without_read,
    },
];

fn many_enabled(ctx: &RuleContext<'_>) -> bool {
    ctx.enabled_count() >= MANY_TOOLS_THRESHOLD
}

fn bash_without_permission(ctx: &RuleContext<'_>) -> bool {
    ctx.run_command_enabled() && !ctx.has_run_command_rule()
}

// The deny/default checks only look at a pattern map; a scalar rule such as
// `bash: ask` has nothing to inspect.
fn bash_without_deny(ctx: &RuleContext<'_>) -> bool {
    ctx.run_command_enabled()
        && ctx.has_run_command_rule()
        && ctx.run_command_patterns().is_some()
        && ctx.run_command_deny_count() == 0
}

fn bash_without_default(ctx: &RuleContext<'_>) -> bool {
    ctx.run_command_enabled()
        && ctx.has_run_command_rule()
        && ctx.run_command_patterns().is_some()
        && !ctx.run_command_has_default()
}

fn write_without_read(ctx: &RuleContext<'_>) -> bool {
    ctx.is_enabled("write") && !ctx.is_enabled("read")
}

fn edit_without_read(ctx: &RuleContext<'_>) -> bool {
    ctx.is_enabled("edit") && !ctx.is_enabled("read")
}

pub struct ToolSafetyRule;

impl Rule for ToolSafetyRule {
    fn category(&self) -> Category {
        Category::ToolSafety
    }

    fn description(&self) -> &'static str {
        "Capability count, run-command permission patterns and read-before-write"
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }
}
