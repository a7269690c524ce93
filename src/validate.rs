//! Schema validation of agent metadata.
//!
//! Unlike the heuristic [`rules`](crate::rules), the validator answers a yes/no
//! question: does the document conform to the metadata schema? Every check
//! appends [`Finding`]s; nothing here returns an error. Absence of optional
//! fields is always valid and at most produces `info` notices.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `schema/malformed-document` | Error | metadata block present and parseable |
//! | `schema/description-missing` | Error | `description` present and non-empty |
//! | `schema/description-type` | Error | `description` is a string |
//! | `schema/description-too-long` | Error | ≤ 1024 characters |
//! | `schema/description-too-short` | Warning | ≥ 20 characters |
//! | `schema/invalid-mode` | Error | `mode` is primary, subagent or all |
//! | `schema/unknown-tool` | Error | tool names come from the capability list |
//! | `schema/tool-not-boolean` | Error | tool values are booleans |
//! | `schema/invalid-permission-level` | Error | permission levels are allow/ask/deny |
//! | `schema/unusual-permission-key` | Warning | recognized permission keys |
//! | `schema/temperature-range` | Error | temperature within [0.0, 1.0] |
//! | `schema/max-steps-range` | Error | `maxSteps` ≥ 1 |
//! | `schema/hidden-without-subagent` | Warning | `hidden` only with subagent mode |
//!
//! See [`rules`] for the full list.

use crate::document::{Document, DocumentError};
use crate::finding::{Category, Finding, Severity, ValidationReport};
use crate::rules::{is_truthy, RuleInfo};
use crate::schema;
use serde_yaml::{Mapping, Value};
use std::path::Path;

pub const MAX_DESCRIPTION_CHARS: usize = 1024;
pub const SHORT_DESCRIPTION_CHARS: usize = 20;

/// Safety vocabulary the validator expects when bash is enabled.
const SAFETY_KEYWORDS: &[&str] = &[
    "safety",
    "confirm",
    "verification",
    "backup",
    "always",
    "never",
    "before",
    "check",
    "verify",
];

fn emit(
    findings: &mut Vec<Finding>,
    id: &str,
    severity: Severity,
    message: impl Into<String>,
    recommendation: Option<&str>,
) {
    findings.push(Finding::new(
        id,
        Category::Schema,
        severity,
        message,
        recommendation,
    ));
}

/// Reads, parses and validates the document at `path`.
///
/// Read and parse failures become a single `schema/malformed-document`
/// error finding instead of an `Err`.
pub fn validate_path(path: &Path, strict: bool) -> ValidationReport {
    match Document::load(path) {
        Ok(doc) => validate_document(&doc, strict),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "document rejected");
            let mut findings = Vec::new();
            emit_malformed(&mut findings, &err);
            ValidationReport::from_findings(path, findings, strict)
        }
    }
}

fn emit_malformed(findings: &mut Vec<Finding>, err: &DocumentError) {
    emit(
        findings,
        "schema/malformed-document",
        Severity::Error,
        err.to_string(),
        Some("Start the file with a '---' line, a YAML mapping, and a closing '---' line"),
    );
}

/// Validates an already-extracted document: metadata first, then the body.
pub fn validate_document(doc: &Document, strict: bool) -> ValidationReport {
    let mut findings = Vec::new();
    validate_metadata(&doc.metadata, &mut findings);
    let tools = doc.field("tools").and_then(Value::as_mapping);
    validate_body(doc.body(), tools, &mut findings);
    ValidationReport::from_findings(&doc.path, findings, strict)
}

/// Validates every metadata field, appending findings in field order.
pub fn validate_metadata(metadata: &Mapping, findings: &mut Vec<Finding>) {
    validate_fields(metadata, findings);
    validate_description(metadata.get("description"), findings);
    validate_mode(metadata.get("mode"), findings);
    validate_tools(metadata.get("tools"), findings);
    validate_permission(metadata.get("permission"), findings);
    validate_optional_fields(metadata, findings);
}

fn validate_fields(metadata: &Mapping, findings: &mut Vec<Finding>) {
    for key in metadata.keys() {
        let name = label(key);
        if schema::DEPRECATED_FIELDS.contains(&name.as_str()) {
            emit(
                findings,
                "schema/deprecated-field",
                Severity::Error,
                format!("Deprecated field '{name}'"),
                Some(&schema::deprecation_suggestion(&name)),
            );
        } else if !schema::KNOWN_FIELDS.contains(&name.as_str()) {
            emit(
                findings,
                "schema/unknown-field",
                Severity::Warning,
                format!("Unknown field '{name}'"),
                Some("Remove the field or check its spelling"),
            );
        }
    }
}

fn validate_description(description: Option<&Value>, findings: &mut Vec<Finding>) {
    let Some(value) = description.filter(|v| is_truthy(v)) else {
        emit(
            findings,
            "schema/description-missing",
            Severity::Error,
            "Missing required field: description",
            Some("Add a description explaining what the agent does and when to use it"),
        );
        return;
    };

    let Some(text) = value.as_str() else {
        emit(
            findings,
            "schema/description-type",
            Severity::Error,
            "'description' must be a string",
            None,
        );
        return;
    };

    let chars = text.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        emit(
            findings,
            "schema/description-too-long",
            Severity::Error,
            format!("Description exceeds {MAX_DESCRIPTION_CHARS} chars (got {chars})"),
            Some("Shorten the description; move detail into the instructions"),
        );
    }
    if chars < SHORT_DESCRIPTION_CHARS {
        emit(
            findings,
            "schema/description-too-short",
            Severity::Warning,
            format!("Description is very short ({chars} chars). Add more detail."),
            None,
        );
    }
    if !text.contains(schema::EXAMPLE_MARKER) {
        emit(
            findings,
            "schema/description-no-example",
            Severity::Warning,
            "Description missing <example> blocks. Consider adding usage examples.",
            None,
        );
    }
    if !crate::rules::frontmatter::has_trigger_phrase(text) {
        emit(
            findings,
            "schema/description-no-trigger",
            Severity::Info,
            "Consider adding trigger keywords like 'Use when...' to description",
            None,
        );
    }
}

fn validate_mode(mode: Option<&Value>, findings: &mut Vec<Finding>) {
    match mode {
        None | Some(Value::Null) => emit(
            findings,
            "schema/mode-missing",
            Severity::Info,
            "No 'mode' specified (defaults to 'all')",
            None,
        ),
        Some(Value::String(m)) if schema::is_execution_mode(m) => {}
        Some(other) => emit(
            findings,
            "schema/invalid-mode",
            Severity::Error,
            format!(
                "Invalid mode '{}'. Must be: {}",
                label(other),
                schema::EXECUTION_MODES.join(", ")
            ),
            None,
        ),
    }
}

fn validate_tools(tools: Option<&Value>, findings: &mut Vec<Finding>) {
    let tools = match tools {
        None | Some(Value::Null) => {
            emit(
                findings,
                "schema/tools-missing",
                Severity::Info,
                "No 'tools' specified (uses global config)",
                None,
            );
            return;
        }
        Some(Value::Mapping(map)) => map,
        Some(_) => {
            emit(
                findings,
                "schema/tools-type",
                Severity::Error,
                "'tools' must be a dictionary/object",
                None,
            );
            return;
        }
    };

    let mut unknown: Vec<String> = tools
        .keys()
        .map(label)
        .filter(|k| !schema::is_capability(k))
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        emit(
            findings,
            "schema/unknown-tool",
            Severity::Error,
            format!("Invalid tools: {}", unknown.join(", ")),
            Some("Use only the known tool names"),
        );
    }

    for (tool, value) in tools {
        if !value.is_bool() {
            emit(
                findings,
                "schema/tool-not-boolean",
                Severity::Error,
                format!(
                    "Tool '{}' must be true/false (boolean), not '{}'",
                    label(tool),
                    label(value)
                ),
                None,
            );
        }
    }

    check_tool_patterns(tools, findings);
}

fn check_tool_patterns(tools: &Mapping, findings: &mut Vec<Finding>) {
    let enabled = |name: &str| tools.get(name).and_then(Value::as_bool).unwrap_or(false);
    let enabled_count = tools
        .values()
        .filter(|v| v.as_bool() == Some(true))
        .count();

    if enabled_count >= crate::rules::tool_safety::MANY_TOOLS_THRESHOLD {
        emit(
            findings,
            "schema/too-many-tools",
            Severity::Warning,
            format!("Agent has {enabled_count} tools enabled. Consider if all are necessary."),
            None,
        );
    }
    if enabled(schema::RUN_COMMAND) {
        emit(
            findings,
            "schema/bash-enabled",
            Severity::Info,
            "Agent has 'bash' enabled - verify permission patterns are configured",
            None,
        );
    }
    if enabled("write") && !enabled("read") {
        emit(
            findings,
            "schema/write-without-read",
            Severity::Warning,
            "Agent has 'write' but not 'read'. Consider adding read.",
            None,
        );
    }
    if enabled("edit") && !enabled("read") {
        emit(
            findings,
            "schema/edit-without-read",
            Severity::Warning,
            "Agent has 'edit' but not 'read'. Consider adding read.",
            None,
        );
    }
}

fn validate_permission(permission: Option<&Value>, findings: &mut Vec<Finding>) {
    let permission = match permission {
        None | Some(Value::Null) => return,
        Some(Value::Mapping(map)) => map,
        Some(_) => {
            emit(
                findings,
                "schema/permission-type",
                Severity::Error,
                "'permission' must be a dictionary/object",
                None,
            );
            return;
        }
    };

    let mut unusual: Vec<String> = permission
        .keys()
        .map(label)
        .filter(|k| !schema::PERMISSION_KEYS.contains(&k.as_str()))
        .collect();
    if !unusual.is_empty() {
        unusual.sort();
        emit(
            findings,
            "schema/unusual-permission-key",
            Severity::Warning,
            format!("Unusual permission keys: {}", unusual.join(", ")),
            None,
        );
    }

    let levels = schema::PERMISSION_LEVELS.join(", ");
    for (key, value) in permission {
        let key = label(key);
        match value {
            Value::String(level) => {
                if !schema::is_permission_level(level) {
                    emit(
                        findings,
                        "schema/invalid-permission-level",
                        Severity::Error,
                        format!(
                            "Permission '{key}' has invalid value '{level}'. Must be: {levels}"
                        ),
                        None,
                    );
                }
            }
            Value::Mapping(patterns) => {
                for (pattern, level) in patterns {
                    let valid = level.as_str().is_some_and(schema::is_permission_level);
                    if !valid {
                        emit(
                            findings,
                            "schema/invalid-permission-pattern",
                            Severity::Error,
                            format!(
                                "Permission '{key}' pattern '{}' has invalid value '{}'",
                                label(pattern),
                                label(level)
                            ),
                            None,
                        );
                    }
                }
            }
            _ => emit(
                findings,
                "schema/permission-shape",
                Severity::Error,
                format!("Permission '{key}' must be a string or dictionary"),
                None,
            ),
        }
    }
}

fn validate_optional_fields(metadata: &Mapping, findings: &mut Vec<Finding>) {
    if let Some(model) = metadata.get("model").filter(|v| is_truthy(v)) {
        match model.as_str() {
            None => emit(
                findings,
                "schema/model-type",
                Severity::Error,
                "'model' must be a string",
                None,
            ),
            Some(m) if !m.contains('/') => emit(
                findings,
                "schema/model-format",
                Severity::Warning,
                format!("Model '{m}' should be in format 'provider/model-id'"),
                None,
            ),
            Some(_) => {}
        }
    }

    if let Some(temp) = metadata.get("temperature").filter(|v| !v.is_null()) {
        match temp.as_f64() {
            None => emit(
                findings,
                "schema/temperature-type",
                Severity::Error,
                "'temperature' must be a number",
                None,
            ),
            Some(t) if !(0.0..=1.0).contains(&t) => emit(
                findings,
                "schema/temperature-range",
                Severity::Error,
                format!("'temperature' must be between 0.0 and 1.0 (got {t})"),
                None,
            ),
            Some(_) => {}
        }
    }

    if let Some(steps) = metadata.get("maxSteps").filter(|v| !v.is_null()) {
        match steps.as_i64() {
            None => emit(
                findings,
                "schema/max-steps-type",
                Severity::Error,
                "'maxSteps' must be an integer",
                None,
            ),
            Some(n) if n < 1 => emit(
                findings,
                "schema/max-steps-range",
                Severity::Error,
                "'maxSteps' must be at least 1",
                None,
            ),
            Some(_) => {}
        }
    }

    if let Some(hidden) = metadata.get("hidden").filter(|v| !v.is_null()) {
        if !hidden.is_bool() {
            emit(
                findings,
                "schema/hidden-type",
                Severity::Error,
                "'hidden' must be true/false (boolean)",
                None,
            );
        }
        let subagent = metadata.get("mode").and_then(Value::as_str) == Some(schema::SUBAGENT_MODE);
        if is_truthy(hidden) && !subagent {
            emit(
                findings,
                "schema/hidden-without-subagent",
                Severity::Warning,
                "'hidden' is only meaningful for mode: subagent",
                None,
            );
        }
    }
}

/// Structural checks on the instruction body.
pub fn validate_body(body: &str, tools: Option<&Mapping>, findings: &mut Vec<Finding>) {
    if body.trim().is_empty() {
        emit(
            findings,
            "schema/empty-body",
            Severity::Error,
            "Agent has no instruction content after frontmatter",
            Some("Add instructions describing responsibilities and workflow"),
        );
        return;
    }

    let bash = tools
        .and_then(|t| t.get(schema::RUN_COMMAND))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if bash {
        let lower = body.to_lowercase();
        let hits = SAFETY_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
        if hits < 3 {
            emit(
                findings,
                "schema/bash-without-safety",
                Severity::Warning,
                "Agent has 'bash' enabled but no clear safety protocols found",
                None,
            );
        }
    }

    if !body.contains("## ") {
        emit(
            findings,
            "schema/no-sections",
            Severity::Warning,
            "No sections found (no ## headers). Consider organizing with headings.",
            None,
        );
    }

    if !body.contains("```") {
        emit(
            findings,
            "schema/no-code-blocks",
            Severity::Info,
            "No code blocks found. Consider adding command examples.",
            None,
        );
    }
}

/// Renders a YAML value for messages: scalars as written, others as YAML.
fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().replace('\n', " "))
            .unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

/// Catalogue of every schema rule.
pub fn rules() -> Vec<RuleInfo> {
    let rule = |id, severity, message, remediation| RuleInfo {
        id,
        severity,
        group: "schema",
        message,
        remediation,
        deduction: None,
    };
    vec![
        rule(
            "schema/malformed-document",
            Severity::Error,
            "Metadata block missing or not a valid YAML mapping",
            "Start the file with a '---' line, a YAML mapping, and a closing '---' line",
        ),
        rule(
            "schema/deprecated-field",
            Severity::Error,
            "Deprecated top-level field (name, skills, permissions)",
            "Remove the field; see the field-specific suggestion",
        ),
        rule(
            "schema/unknown-field",
            Severity::Warning,
            "Top-level field is not part of the schema",
            "Remove the field or check its spelling",
        ),
        rule(
            "schema/description-missing",
            Severity::Error,
            "Missing required field: description",
            "Add a description explaining what the agent does and when to use it",
        ),
        rule(
            "schema/description-type",
            Severity::Error,
            "'description' must be a string",
            "Write the description as a YAML string or block scalar",
        ),
        rule(
            "schema/description-too-long",
            Severity::Error,
            "Description exceeds 1024 characters",
            "Shorten the description; move detail into the instructions",
        ),
        rule(
            "schema/description-too-short",
            Severity::Warning,
            "Description is shorter than 20 characters",
            "Add more detail to the description",
        ),
        rule(
            "schema/description-no-example",
            Severity::Warning,
            "Description missing <example> blocks",
            "Add <example> blocks showing typical usage",
        ),
        rule(
            "schema/description-no-trigger",
            Severity::Info,
            "Description has no trigger keywords",
            "Add 'Use when...' to the description",
        ),
        rule(
            "schema/mode-missing",
            Severity::Info,
            "No 'mode' specified (defaults to 'all')",
            "Set mode to primary, subagent or all",
        ),
        rule(
            "schema/invalid-mode",
            Severity::Error,
            "Mode is not primary, subagent or all",
            "Set mode to primary, subagent or all",
        ),
        rule(
            "schema/tools-missing",
            Severity::Info,
            "No 'tools' specified (uses global config)",
            "Declare the tools the agent needs",
        ),
        rule(
            "schema/tools-type",
            Severity::Error,
            "'tools' must be a mapping",
            "Write tools as 'name: true/false' pairs",
        ),
        rule(
            "schema/unknown-tool",
            Severity::Error,
            "Tool name outside the known capability list",
            "Use only bash, read, write, edit, glob, grep, task, skill, webfetch, todoread, todowrite",
        ),
        rule(
            "schema/tool-not-boolean",
            Severity::Error,
            "Tool value must be true or false",
            "Replace the value with true or false",
        ),
        rule(
            "schema/too-many-tools",
            Severity::Warning,
            "Nine or more tools enabled",
            "Apply least privilege and disable unused tools",
        ),
        rule(
            "schema/bash-enabled",
            Severity::Info,
            "bash enabled - verify permission patterns",
            "Configure permission.bash patterns",
        ),
        rule(
            "schema/write-without-read",
            Severity::Warning,
            "write enabled without read",
            "Enable read so the agent can inspect files first",
        ),
        rule(
            "schema/edit-without-read",
            Severity::Warning,
            "edit enabled without read",
            "Enable read so the agent can inspect files first",
        ),
        rule(
            "schema/permission-type",
            Severity::Error,
            "'permission' must be a mapping",
            "Write permission as a mapping of tool to level or patterns",
        ),
        rule(
            "schema/unusual-permission-key",
            Severity::Warning,
            "Permission key outside bash, edit, write, webfetch, skill, task",
            "Check the key name; unknown keys may be ignored by the runtime",
        ),
        rule(
            "schema/invalid-permission-level",
            Severity::Error,
            "Permission level is not allow, ask or deny",
            "Use allow, ask or deny",
        ),
        rule(
            "schema/invalid-permission-pattern",
            Severity::Error,
            "Permission pattern level is not allow, ask or deny",
            "Use allow, ask or deny for every pattern",
        ),
        rule(
            "schema/permission-shape",
            Severity::Error,
            "Permission entry must be a string or mapping",
            "Use a level or a pattern mapping",
        ),
        rule(
            "schema/model-type",
            Severity::Error,
            "'model' must be a string",
            "Write the model as 'provider/model-id'",
        ),
        rule(
            "schema/model-format",
            Severity::Warning,
            "Model should be in format 'provider/model-id'",
            "Prefix the model with its provider",
        ),
        rule(
            "schema/temperature-type",
            Severity::Error,
            "'temperature' must be a number",
            "Use a number between 0.0 and 1.0",
        ),
        rule(
            "schema/temperature-range",
            Severity::Error,
            "'temperature' outside 0.0 to 1.0",
            "Use a number between 0.0 and 1.0",
        ),
        rule(
            "schema/max-steps-type",
            Severity::Error,
            "'maxSteps' must be an integer",
            "Use a positive integer",
        ),
        rule(
            "schema/max-steps-range",
            Severity::Error,
            "'maxSteps' must be at least 1",
            "Use a positive integer",
        ),
        rule(
            "schema/hidden-type",
            Severity::Error,
            "'hidden' must be a boolean",
            "Use true or false",
        ),
        rule(
            "schema/hidden-without-subagent",
            Severity::Warning,
            "'hidden' is only meaningful for mode: subagent",
            "Set mode: subagent or remove hidden",
        ),
        rule(
            "schema/empty-body",
            Severity::Error,
            "No instruction content after frontmatter",
            "Add instructions describing responsibilities and workflow",
        ),
        rule(
            "schema/bash-without-safety",
            Severity::Warning,
            "bash enabled but no clear safety protocols",
            "Describe confirmation, backup and verification steps",
        ),
        rule(
            "schema/no-sections",
            Severity::Warning,
            "No ## sections in the instructions",
            "Organize the instructions with headings",
        ),
        rule(
            "schema/no-code-blocks",
            Severity::Info,
            "No code blocks in the instructions",
            "Add command examples",
        ),
    ]
}
