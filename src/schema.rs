//! Fixed vocabularies of the agent metadata schema.
//!
//! Every table here is a process-wide, read-only constant. Validation,
//! the heuristic rules and the consistency scanner all read from these
//! tables; nothing mutates them at runtime.

/// Capability (tool) names an agent may toggle in its `tools` map.
///
/// `bash` is the run-command capability.
pub const CAPABILITIES: &[&str] = &[
    "bash",
    "read",
    "write",
    "edit",
    "glob",
    "grep",
    "task",
    "skill",
    "webfetch",
    "todoread",
    "todowrite",
];

/// The run-command capability.
pub const RUN_COMMAND: &str = "bash";

/// Valid values for the `mode` field.
pub const EXECUTION_MODES: &[&str] = &["primary", "subagent", "all"];

/// The execution mode that makes `hidden` meaningful.
pub const SUBAGENT_MODE: &str = "subagent";

/// Valid permission levels, either as a scalar or as a pattern value.
pub const PERMISSION_LEVELS: &[&str] = &["allow", "ask", "deny"];

/// Top-level keys recognized inside the `permission` map.
///
/// Anything else only produces a warning so that newer runtime keys are
/// tolerated.
pub const PERMISSION_KEYS: &[&str] = &["bash", "edit", "write", "webfetch", "skill", "task"];

/// Current top-level metadata fields.
pub const KNOWN_FIELDS: &[&str] = &[
    "description",
    "mode",
    "tools",
    "permission",
    "model",
    "temperature",
    "maxSteps",
    "hidden",
];

/// Retired top-level fields that must not appear in metadata or examples.
pub const DEPRECATED_FIELDS: &[&str] = &["name", "skills", "permissions"];

/// Phrases that tell the runtime when an agent should be invoked.
pub const TRIGGER_PHRASES: &[&str] = &["use when", "use for", "invoke when", "use proactively"];

/// Marker that opens a usage example inside the description.
pub const EXAMPLE_MARKER: &str = "<example>";

/// Where agent definition files are installed.
pub const CORRECT_AGENT_PATH: &str = "~/.config/opencode/agent/";

/// Agent directories that are commonly written but wrong.
pub const INCORRECT_AGENT_PATHS: &[&str] = &[
    "~/.config/opencode/agents/",
    "~/.config/claude/agent/",
    "~/.claude/agent/",
];

/// Remediation text for a deprecated top-level field.
///
/// # Examples
///
/// ```
/// use oxidized_agents::schema::deprecation_suggestion;
///
/// assert!(deprecation_suggestion("skills").contains("runtime"));
/// ```
pub fn deprecation_suggestion(field: &str) -> String {
    match field {
        "name" => "Remove 'name:' - agent name comes from the filename".to_string(),
        "skills" => "Remove 'skills:' - skills are loaded at runtime via the skill tool. \
                     Document when to load skills in agent instructions instead."
            .to_string(),
        "permissions" => "Rename to 'tools:' for tool enablement, or 'permission:' for \
                          access control patterns"
            .to_string(),
        other => format!("Remove deprecated field '{other}'"),
    }
}

pub fn is_capability(name: &str) -> bool {
    CAPABILITIES.contains(&name)
}

pub fn is_execution_mode(mode: &str) -> bool {
    EXECUTION_MODES.contains(&mode)
}

pub fn is_permission_level(level: &str) -> bool {
    PERMISSION_LEVELS.contains(&level)
}
