//! Tree-wide consistency scanning.
//!
//! [`check_tree`] walks every Markdown document under a root and looks for
//! schema drift: deprecated fields in YAML examples, wrong install paths,
//! prose that still recommends retired fields, dangling relative links and
//! duplicate section numbers in the index document.
//!
//! The per-file checks run in parallel via [rayon] and share no state. Link
//! resolution and section numbering run afterwards, sequentially, and the
//! final issue list is sorted by file, then line, then discovery order so the
//! report does not depend on scheduling.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `consistency/deprecated-field` | Error | `name:`, `skills:`, `permissions:` in YAML blocks |
//! | `consistency/plural-permission` | Error | `permissions:` instead of `permission:` |
//! | `consistency/incorrect-path` | Error | known-wrong agent install paths |
//! | `consistency/deprecated-reference` | Warning | prose suggesting `skills:` (approximate) |
//! | `consistency/broken-link` | Warning | relative link to a missing file |
//! | `consistency/duplicate-section` | Error | repeated heading number in the index document |
//! | `consistency/unreadable-file` | Error | file could not be read |

pub mod fields;
pub mod links;
pub mod numbering;
pub mod paths;
pub mod references;

use crate::config::{self, Config};
use crate::finding::{ConsistencyIssue, ConsistencyReport, Severity};
use crate::rules::RuleInfo;
use links::{LinkGraph, LinkRef};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Conditions that stop a scan before any file is read.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("path does not exist: {0}")]
    MissingRoot(PathBuf),
    #[error("not a valid documentation tree (no {index}): {root}")]
    MissingIndex { root: PathBuf, index: String },
}

/// Everything the per-file pass learns about one document.
struct FileScan {
    rel: String,
    issues: Vec<ConsistencyIssue>,
    yaml_blocks: usize,
    links: Vec<LinkRef>,
    /// Kept only for the index document.
    text: Option<String>,
}

/// Scans the tree under `root` and returns one aggregated report.
///
/// Per-file read failures and entries the walk cannot read are recorded as
/// `consistency/unreadable-file` errors and the scan carries on with the
/// remaining files.
///
/// # Errors
///
/// - [`ScanError::MissingRoot`] when `root` does not exist.
/// - [`ScanError::MissingIndex`] when the configured index document is not
///   present directly under `root`.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use oxidized_agents::{config::Config, consistency};
///
/// let report = consistency::check_tree(Path::new("./agent-creator"), &Config::default()).unwrap();
/// std::process::exit(if report.is_consistent { 0 } else { 1 });
/// ```
pub fn check_tree(root: &Path, config: &Config) -> Result<ConsistencyReport, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    let index = config.consistency.index_document.as_str();
    if !root.join(index).is_file() {
        return Err(ScanError::MissingIndex {
            root: root.to_path_buf(),
            index: index.to_string(),
        });
    }

    let (files, walk_errors) = collect_documents(root);
    tracing::debug!(root = %root.display(), files = files.len(), "scanning tree");

    let scans: Vec<FileScan> = files
        .par_iter()
        .map(|path| scan_file(root, path, config))
        .collect();

    let mut issues: Vec<ConsistencyIssue> = walk_errors
        .iter()
        .map(|err| walk_error_issue(root, err))
        .collect();
    let mut yaml_blocks = 0;
    let mut graph = LinkGraph::new(root);
    let mut index_text = None;

    for scan in scans {
        yaml_blocks += scan.yaml_blocks;
        issues.extend(scan.issues);
        graph.add_document(&scan.rel, scan.links);
        if scan.text.is_some() {
            index_text = scan.text;
        }
    }

    issues.extend(graph.dangling());

    if let Some(text) = index_text {
        issues.extend(numbering::check_section_numbering(index, &text));
    }

    // Stable sort: ties keep discovery order.
    issues.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));

    let suppressions = config::load_suppressions(root);
    Ok(ConsistencyReport::from_issues(
        root,
        files.len(),
        yaml_blocks,
        issues,
        &suppressions,
        config.strict.enabled,
    ))
}

fn scan_file(root: &Path, path: &Path, config: &Config) -> FileScan {
    let rel = relative_path(root, path);
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(file = %rel, error = %e, "could not read file");
            let issue = ConsistencyIssue::new(
                "consistency/unreadable-file",
                Severity::Error,
                &rel,
                None,
                format!("Could not read file: {e}"),
                None,
            );
            return FileScan {
                rel,
                issues: vec![issue],
                yaml_blocks: 0,
                links: vec![],
                text: None,
            };
        }
    };

    let lines: Vec<&str> = content.split('\n').collect();
    let fenced = fence_mask(&lines);

    let (mut issues, yaml_blocks) = fields::check_yaml_blocks(&rel, &content);
    issues.extend(paths::check_paths(&rel, &lines));
    if config.consistency.deprecated_references {
        issues.extend(references::check_deprecated_references(&rel, &lines, &fenced));
    }
    let links = links::extract_links(&lines, &fenced);

    tracing::debug!(file = %rel, issues = issues.len(), links = links.len(), "scanned file");

    let text = (rel == config.consistency.index_document).then_some(content);
    FileScan {
        rel,
        issues,
        yaml_blocks,
        links,
        text,
    }
}

/// Recursively collects Markdown files under `root`, sorted by path.
///
/// Symlinks are followed. Entries the walk cannot read (unreadable
/// directories, dangling links, link cycles) are returned separately so the
/// caller can report them instead of silently scanning less of the tree.
pub fn collect_documents(root: &Path) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(e) if e.file_type().is_file() && is_markdown(e.path()) => {
                files.push(e.into_path());
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
    }
    files.sort();
    (files, errors)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
}

fn walk_error_issue(root: &Path, err: &walkdir::Error) -> ConsistencyIssue {
    let rel = err
        .path()
        .map(|p| relative_path(root, p))
        .unwrap_or_default();
    tracing::warn!(file = %rel, error = %err, "could not walk entry");
    ConsistencyIssue::new(
        "consistency/unreadable-file",
        Severity::Error,
        &rel,
        None,
        format!("Could not read file: {err}"),
        None,
    )
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Marks every line that is a code fence or sits inside a fenced block.
pub fn fence_mask(lines: &[&str]) -> Vec<bool> {
    let mut inside = false;
    lines
        .iter()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                inside = !inside;
                true
            } else {
                inside
            }
        })
        .collect()
}

/// Catalogue of every consistency rule.
pub fn rules() -> Vec<RuleInfo> {
    let rule = |id, severity, message, remediation| RuleInfo {
        id,
        severity,
        group: "consistency",
        message,
        remediation,
        deduction: None,
    };
    vec![
        rule(
            "consistency/deprecated-field",
            Severity::Error,
            "Deprecated field found in YAML example",
            "Remove 'name:' and 'skills:'; rename 'permissions:'",
        ),
        rule(
            "consistency/plural-permission",
            Severity::Error,
            "Field 'permissions:' should be 'permission:' (singular)",
            "Change 'permissions:' to 'permission:'",
        ),
        rule(
            "consistency/incorrect-path",
            Severity::Error,
            "Incorrect agent install path",
            "Use '~/.config/opencode/agent/'",
        ),
        rule(
            "consistency/deprecated-reference",
            Severity::Warning,
            "Prose may suggest the deprecated 'skills:' field (approximate)",
            "Verify this doesn't suggest using skills: in frontmatter",
        ),
        rule(
            "consistency/broken-link",
            Severity::Warning,
            "Relative link target does not exist",
            "Fix the link or create the missing file",
        ),
        rule(
            "consistency/duplicate-section",
            Severity::Error,
            "Duplicate section number in the index document",
            "Renumber sections sequentially",
        ),
        rule(
            "consistency/unreadable-file",
            Severity::Error,
            "File could not be read",
            "Check file permissions and encoding (UTF-8)",
        ),
    ]
}
