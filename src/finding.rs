//! Shared result types.
//!
//! Single-document audit and validation produce [`Finding`]s; the tree-wide
//! consistency scan produces [`ConsistencyIssue`]s. Both share one
//! [`Severity`] enum and expose the same severity views through
//! [`SeverityCounts`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// The area of a document a finding belongs to.
///
/// The five scored categories are listed in [`Category::SCORED`]; `Schema`
/// is used by the validator only and never carries a score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FrontmatterQuality,
    ToolSafety,
    InstructionQuality,
    Security,
    Documentation,
    Schema,
}

impl Category {
    /// Categories that receive a score during an audit, in report order.
    pub const SCORED: [Category; 5] = [
        Category::FrontmatterQuality,
        Category::ToolSafety,
        Category::InstructionQuality,
        Category::Security,
        Category::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FrontmatterQuality => "frontmatter_quality",
            Category::ToolSafety => "tool_safety",
            Category::InstructionQuality => "instruction_quality",
            Category::Security => "security",
            Category::Documentation => "documentation",
            Category::Schema => "schema",
        }
    }

    /// Human-readable title, e.g. `"Tool Safety"`.
    pub fn title(&self) -> &'static str {
        match self {
            Category::FrontmatterQuality => "Frontmatter Quality",
            Category::ToolSafety => "Tool Safety",
            Category::InstructionQuality => "Instruction Quality",
            Category::Security => "Security",
            Category::Documentation => "Documentation",
            Category::Schema => "Schema",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-document observation produced by the validator or a heuristic rule.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn new(
        rule_id: &str,
        category: Category,
        severity: Severity,
        message: impl Into<String>,
        recommendation: Option<&str>,
    ) -> Self {
        Finding {
            rule_id: rule_id.to_string(),
            category,
            severity,
            message: message.into(),
            recommendation: recommendation.map(str::to_string),
        }
    }
}

/// A tree-wide consistency observation, scoped to a file and optionally a line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsistencyIssue {
    pub rule_id: String,
    pub severity: Severity,
    /// Path relative to the scanned root, `/`-separated.
    pub file: String,
    pub line: Option<usize>,
    pub message: String,
    pub suggestion: Option<String>,
    pub suppressed: bool,
    pub suppression_reason: Option<String>,
}

impl ConsistencyIssue {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        file: &str,
        line: Option<usize>,
        message: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        ConsistencyIssue {
            rule_id: rule_id.to_string(),
            severity,
            file: file.to_string(),
            line,
            message: message.into(),
            suggestion,
            suppressed: false,
            suppression_reason: None,
        }
    }
}

/// Anything that carries a [`Severity`].
pub trait HasSeverity {
    fn severity(&self) -> Severity;
}

impl HasSeverity for Finding {
    fn severity(&self) -> Severity {
        self.severity
    }
}

impl HasSeverity for ConsistencyIssue {
    fn severity(&self) -> Severity {
        self.severity
    }
}

/// Severity views shared by every report shape.
pub trait SeverityCounts {
    type Item: HasSeverity;

    /// The active (unsuppressed) items of the report.
    fn items(&self) -> &[Self::Item];

    fn errors(&self) -> Vec<&Self::Item> {
        self.with_severity(Severity::Error)
    }

    fn warnings(&self) -> Vec<&Self::Item> {
        self.with_severity(Severity::Warning)
    }

    fn infos(&self) -> Vec<&Self::Item> {
        self.with_severity(Severity::Info)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&Self::Item> {
        self.items()
            .iter()
            .filter(|i| i.severity() == severity)
            .collect()
    }

    /// Returns `(errors, warnings, info)` in a single pass.
    fn count_by_severity(&self) -> (usize, usize, usize) {
        self.items()
            .iter()
            .fold((0, 0, 0), |(e, w, i), item| match item.severity() {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }
}

/// Pass/fail outcome of validation or a consistency scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Warning,
    Failed,
}

/// Derives a [`Status`] from a set of items.
///
/// Errors always fail. Warnings fail only in strict mode.
pub fn compute_status<T: HasSeverity>(items: &[T], strict: bool) -> Status {
    let (has_errors, has_warnings) =
        items
            .iter()
            .fold((false, false), |(e, w), item| match item.severity() {
                Severity::Error => (true, w),
                Severity::Warning => (e, true),
                Severity::Info => (e, w),
            });

    if has_errors {
        Status::Failed
    } else if has_warnings {
        if strict {
            Status::Failed
        } else {
            Status::Warning
        }
    } else {
        Status::Passed
    }
}

/// Coarse risk classification derived from capabilities and permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
        }
    }
}

/// Overall quality banner derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            Verdict::Excellent
        } else if score >= 3.5 {
            Verdict::Good
        } else if score >= 2.5 {
            Verdict::Fair
        } else {
            Verdict::NeedsWork
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT - Agent follows best practices",
            Verdict::Good => "GOOD - Agent is solid with minor improvements needed",
            Verdict::Fair => "FAIR - Agent needs some improvements",
            Verdict::NeedsWork => "NEEDS WORK - Agent requires significant improvements",
        }
    }
}

/// Per-category scores in `[0.0, 5.0]`, keyed in [`Category`] order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ScoreCard {
    scores: BTreeMap<Category, f64>,
}

impl ScoreCard {
    /// Records the score for `category`, replacing any earlier value.
    pub fn insert(&mut self, category: Category, score: f64) {
        self.scores.insert(category, score.clamp(0.0, 5.0));
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.scores.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.scores.iter().map(|(c, s)| (*c, *s))
    }
}

/// Result of a full heuristic audit of one document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditReport {
    /// Agent name, taken from the file stem.
    pub agent: String,
    pub path: PathBuf,
    pub audit_timestamp: String,
    pub overall_score: f64,
    pub risk_level: RiskTier,
    pub verdict: Verdict,
    pub scores: ScoreCard,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    /// Recommendations of every finding, deduplicated, in first-seen order.
    pub fn recommendations(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.findings
            .iter()
            .filter_map(|f| f.recommendation.as_deref())
            .filter(|r| seen.insert(*r))
            .collect()
    }
}

impl SeverityCounts for AuditReport {
    type Item = Finding;

    fn items(&self) -> &[Finding] {
        &self.findings
    }
}

/// Result of validating one document against the metadata schema.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationReport {
    pub agent: String,
    pub path: PathBuf,
    pub status: Status,
    /// `true` iff no finding has error severity.
    pub is_valid: bool,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn from_findings(path: &Path, findings: Vec<Finding>, strict: bool) -> Self {
        let status = compute_status(&findings, strict);
        let is_valid = !findings.iter().any(|f| f.severity == Severity::Error);
        ValidationReport {
            agent: agent_name(path),
            path: path.to_path_buf(),
            status,
            is_valid,
            findings,
        }
    }

    pub fn passed(&self) -> bool {
        !matches!(self.status, Status::Failed)
    }
}

impl SeverityCounts for ValidationReport {
    type Item = Finding;

    fn items(&self) -> &[Finding] {
        &self.findings
    }
}

/// Aggregated result of a tree-wide consistency scan.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConsistencyReport {
    pub root: PathBuf,
    pub files_checked: usize,
    pub yaml_blocks_checked: usize,
    pub status: Status,
    /// `true` iff no active issue has error severity.
    pub is_consistent: bool,
    pub issues: Vec<ConsistencyIssue>,
    pub suppressed: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    /// Builds a report from already-ordered issues, moving any that match a
    /// suppression into [`ConsistencyReport::suppressed`].
    pub fn from_issues(
        root: &Path,
        files_checked: usize,
        yaml_blocks_checked: usize,
        issues: Vec<ConsistencyIssue>,
        suppressions: &[crate::config::Suppression],
        strict: bool,
    ) -> Self {
        let mut active = Vec::new();
        let mut suppressed = Vec::new();

        for mut issue in issues {
            if let Some(s) = find_suppression(&issue, suppressions) {
                issue.suppressed = true;
                issue.suppression_reason = Some(s.reason.clone());
                suppressed.push(issue);
            } else {
                active.push(issue);
            }
        }

        let status = compute_status(&active, strict);
        let is_consistent = !active.iter().any(|i| i.severity == Severity::Error);

        ConsistencyReport {
            root: root.to_path_buf(),
            files_checked,
            yaml_blocks_checked,
            status,
            is_consistent,
            issues: active,
            suppressed,
        }
    }

    pub fn passed(&self) -> bool {
        !matches!(self.status, Status::Failed)
    }
}

impl SeverityCounts for ConsistencyReport {
    type Item = ConsistencyIssue;

    fn items(&self) -> &[ConsistencyIssue] {
        &self.issues
    }
}

/// Agent name from a document path: the file stem, or `"unknown"`.
pub fn agent_name(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn find_suppression<'a>(
    issue: &ConsistencyIssue,
    suppressions: &'a [crate::config::Suppression],
) -> Option<&'a crate::config::Suppression> {
    suppressions.iter().find(|s| {
        if s.rule != issue.rule_id {
            return false;
        }
        // Path::ends_with compares whole components, so "agent.md" does not
        // match "my-agent.md". An empty file entry matches every file.
        if !s.file.is_empty() && !Path::new(&issue.file).ends_with(Path::new(&s.file)) {
            return false;
        }
        if let (Some(ref lines), Some(line)) = (&s.lines, issue.line) {
            match parse_line_range(lines) {
                Some((start, end)) if line >= start && line <= end => {}
                _ => return false,
            }
        }
        true
    })
}

fn parse_line_range(lines: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = lines.split('-').collect();
    if parts.len() == 2 {
        let start = parts[0].trim().parse().ok()?;
        let end = parts[1].trim().parse().ok()?;
        if start > end {
            return None;
        }
        Some((start, end))
    } else if parts.len() == 1 {
        let line = parts[0].trim().parse().ok()?;
        Some((line, line))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_range_single_and_span() {
        assert_eq!(parse_line_range("7"), Some((7, 7)));
        assert_eq!(parse_line_range("3-9"), Some((3, 9)));
        assert_eq!(parse_line_range("9-3"), None);
        assert_eq!(parse_line_range("a-b"), None);
        assert_eq!(parse_line_range("1-2-3"), None);
    }

    #[test]
    fn status_respects_strict() {
        let warn = vec![Finding::new(
            "x/y",
            Category::Schema,
            Severity::Warning,
            "w",
            None,
        )];
        assert_eq!(compute_status(&warn, false), Status::Warning);
        assert_eq!(compute_status(&warn, true), Status::Failed);
        assert_eq!(compute_status::<Finding>(&[], true), Status::Passed);
    }
}
