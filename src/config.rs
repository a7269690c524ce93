//! Configuration loading and management.
//!
//! Provides types for the TOML-based configuration file and for issue
//! suppression rules stored in `.oxidized-agents-ignore` files.
//!
//! # Configuration file
//!
//! The default configuration file is `oxidized-agents.toml` in the current
//! working directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use oxidized_agents::config::Config;
//! use oxidized_agents::finding::Category;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_category_enabled(Category::Security));
//! ```
//!
//! # Suppression files
//!
//! Place a `.oxidized-agents-ignore` file at the root of a documentation tree
//! to suppress specific consistency issues. See [`Suppression`] for the format
//! and [`load_suppressions`] for loading.

use crate::finding::Category;
use std::path::Path;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "oxidized-agents.toml";

/// Suppression file looked up at the root of a scanned tree.
pub const SUPPRESSION_FILE: &str = ".oxidized-agents-ignore";

/// Main configuration.
///
/// All fields carry defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// When strict mode is enabled, warnings fail `validate` and `check`.
    pub strict: StrictConfig,
    /// Per-category on/off toggles for the heuristic audit.
    pub rules: RulesConfig,
    /// Tree scan settings.
    pub consistency: ConsistencyConfig,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    pub enabled: bool,
}

/// Per-category toggles.
///
/// A disabled category emits no findings and keeps its ceiling score, so the
/// score card always holds five entries.
///
/// ```toml
/// [rules]
/// documentation = false
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RulesConfig {
    pub frontmatter_quality: bool,
    pub tool_safety: bool,
    pub instruction_quality: bool,
    pub security: bool,
    pub documentation: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            frontmatter_quality: true,
            tool_safety: true,
            instruction_quality: true,
            security: true,
            documentation: true,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Document checked for duplicate section numbers; must exist at the root.
    pub index_document: String,
    /// Prose heuristic that flags text suggesting `skills:` in metadata.
    /// It is approximate and can be switched off without touching the hard
    /// deprecation checks.
    pub deprecated_references: bool,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        ConsistencyConfig {
            index_document: "SKILL.md".to_string(),
            deprecated_references: true,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if the heuristic category is enabled.
    ///
    /// [`Category::Schema`] has no toggle and is always enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxidized_agents::config::Config;
    /// use oxidized_agents::finding::Category;
    ///
    /// let mut config = Config::default();
    /// config.rules.security = false;
    /// assert!(!config.is_category_enabled(Category::Security));
    /// assert!(config.is_category_enabled(Category::Schema));
    /// ```
    pub fn is_category_enabled(&self, category: Category) -> bool {
        match category {
            Category::FrontmatterQuality => self.rules.frontmatter_quality,
            Category::ToolSafety => self.rules.tool_safety,
            Category::InstructionQuality => self.rules.instruction_quality,
            Category::Security => self.rules.security,
            Category::Documentation => self.rules.documentation,
            Category::Schema => true,
        }
    }
}

/// Root structure of an `.oxidized-agents-ignore` TOML file.
///
/// # File format
///
/// ```toml
/// [[suppress]]
/// rule = "consistency/broken-link"
/// file = "references/legacy.md"
/// lines = "10-20"
/// reason = "Archived page, links kept for history"
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct SuppressionFile {
    pub suppress: Vec<Suppression>,
}

/// A rule that silences a specific consistency issue.
///
/// A suppression matches a [`ConsistencyIssue`](crate::finding::ConsistencyIssue) when:
/// - `rule` equals the issue's `rule_id`,
/// - `file` is a path suffix of the issue's file (empty string matches all),
/// - `lines` (if set) contains the issue's line number.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Suppression {
    pub rule: String,
    pub file: String,
    /// Optional line range (`"10-20"`) or single line (`"15"`).
    pub lines: Option<String>,
    pub reason: String,
    /// Optional issue-tracker reference.
    pub ticket: Option<String>,
}

/// Loads suppression rules from `root`'s [`SUPPRESSION_FILE`].
///
/// Returns an empty vector when the file is absent or unreadable; a parse
/// failure is logged and also yields no suppressions.
pub fn load_suppressions(root: &Path) -> Vec<Suppression> {
    let ignore_path = root.join(SUPPRESSION_FILE);
    if !ignore_path.exists() {
        return vec![];
    }

    let content = match std::fs::read_to_string(&ignore_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %ignore_path.display(), error = %e, "cannot read suppression file");
            return vec![];
        }
    };

    match toml::from_str::<SuppressionFile>(&content) {
        Ok(file) => file.suppress,
        Err(e) => {
            tracing::warn!(path = %ignore_path.display(), error = %e, "failed to parse suppression file");
            vec![]
        }
    }
}
