//! JSON output formatter.
//!
//! Every document carries the report itself plus a severity summary, so
//! scripts do not have to count findings themselves.

use crate::finding::{
    AuditReport, ConsistencyIssue, ConsistencyReport, Finding, RiskTier, ScoreCard,
    SeverityCounts, Status, ValidationReport, Verdict,
};

#[derive(serde::Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    info: usize,
}

impl Summary {
    fn of<R: SeverityCounts>(report: &R) -> Self {
        let (errors, warnings, info) = report.count_by_severity();
        Summary {
            errors,
            warnings,
            info,
        }
    }
}

#[derive(serde::Serialize)]
struct AuditOutput<'a> {
    agent: &'a str,
    path: String,
    audit_timestamp: &'a str,
    overall_score: f64,
    risk_level: RiskTier,
    verdict: Verdict,
    scores: &'a ScoreCard,
    summary: Summary,
    findings: &'a [Finding],
    recommendations: Vec<&'a str>,
}

#[derive(serde::Serialize)]
struct ValidationOutput<'a> {
    agent: &'a str,
    path: String,
    status: Status,
    is_valid: bool,
    summary: Summary,
    findings: &'a [Finding],
}

#[derive(serde::Serialize)]
struct ConsistencyOutput<'a> {
    root: String,
    files_checked: usize,
    yaml_blocks_checked: usize,
    status: Status,
    is_consistent: bool,
    summary: Summary,
    issues: &'a [ConsistencyIssue],
    suppressed: &'a [ConsistencyIssue],
}

/// Formats an [`AuditReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn audit(report: &AuditReport) -> String {
    let output = AuditOutput {
        agent: &report.agent,
        path: report.path.to_string_lossy().into_owned(),
        audit_timestamp: &report.audit_timestamp,
        overall_score: report.overall_score,
        risk_level: report.risk_level,
        verdict: report.verdict,
        scores: &report.scores,
        summary: Summary::of(report),
        findings: &report.findings,
        recommendations: report.recommendations(),
    };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}

/// Formats a [`ValidationReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn validation(report: &ValidationReport) -> String {
    let output = ValidationOutput {
        agent: &report.agent,
        path: report.path.to_string_lossy().into_owned(),
        status: report.status,
        is_valid: report.is_valid,
        summary: Summary::of(report),
        findings: &report.findings,
    };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}

/// Formats a [`ConsistencyReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn consistency(report: &ConsistencyReport) -> String {
    let output = ConsistencyOutput {
        root: report.root.to_string_lossy().into_owned(),
        files_checked: report.files_checked,
        yaml_blocks_checked: report.yaml_blocks_checked,
        status: report.status,
        is_consistent: report.is_consistent,
        summary: Summary::of(report),
        issues: &report.issues,
        suppressed: &report.suppressed,
    };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
