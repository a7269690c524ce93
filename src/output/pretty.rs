//! Human-readable colored text formatter.
//!
//! Produces terminal-friendly reports with ANSI color codes: a header, the
//! report body, and a one-line summary.

use crate::finding::{
    AuditReport, ConsistencyReport, Finding, RiskTier, Severity, SeverityCounts, Status,
    ValidationReport, Verdict,
};
use colored::Colorize;

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: agent name and timestamp.
/// 2. **Scores**: one line per category, then the overall score.
/// 3. **Findings**: with severity and rule ID.
/// 4. **Recommendations**: deduplicated.
/// 5. **Summary**: risk tier and verdict.
pub fn audit(report: &AuditReport) -> String {
    let mut out = header(&format!("Agent Audit: {}", report.agent));
    out.push_str(&format!("  Timestamp: {}\n\n", report.audit_timestamp));

    out.push_str(&format!("{}\n", "Scores".bold().underline()));
    for (category, score) in report.scores.iter() {
        out.push_str(&format!(
            "  {title:<22} {score}\n",
            title = category.title(),
            score = score_str(score),
        ));
    }
    out.push_str(&format!(
        "  {:<22} {}\n\n",
        "Overall".bold(),
        score_str(report.overall_score).bold()
    ));

    push_findings(&mut out, &report.findings);

    let recommendations = report.recommendations();
    if !recommendations.is_empty() {
        out.push_str(&format!("{}\n", "Recommendations".bold().underline()));
        for (i, rec) in recommendations.iter().enumerate() {
            out.push_str(&format!("  {}. {rec}\n", i + 1));
        }
        out.push('\n');
    }

    let risk = match report.risk_level {
        RiskTier::Low => "LOW".green().bold().to_string(),
        RiskTier::Medium => "MEDIUM".yellow().bold().to_string(),
        RiskTier::High => "HIGH".red().bold().to_string(),
    };
    let verdict = match report.verdict {
        Verdict::Excellent | Verdict::Good => report.verdict.describe().green().to_string(),
        Verdict::Fair => report.verdict.describe().yellow().to_string(),
        Verdict::NeedsWork => report.verdict.describe().red().to_string(),
    };
    out.push_str(&format!("Risk: {risk}  |  {verdict}\n"));

    out
}

/// Formats a [`ValidationReport`] as human-readable, ANSI-colored text.
pub fn validation(report: &ValidationReport) -> String {
    let mut out = header(&format!("Agent Validation: {}", report.agent));
    out.push_str(&format!("  Path: {}\n\n", report.path.display()));

    push_findings(&mut out, &report.findings);

    let (errors, warnings, info) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {}  |  {} errors, {} warnings, {} info\n",
        status_str(report.status),
        errors,
        warnings,
        info,
    ));
    out
}

/// Formats a [`ConsistencyReport`] as human-readable, ANSI-colored text.
///
/// Issues are listed in report order with their `file:line` location and
/// suggestion; suppressed issues follow with their reasons.
pub fn consistency(report: &ConsistencyReport) -> String {
    let mut out = header(&format!("Consistency Check: {}", report.root.display()));
    out.push_str(&format!(
        "  {} files checked, {} YAML blocks checked\n\n",
        report.files_checked, report.yaml_blocks_checked
    ));

    if !report.issues.is_empty() {
        out.push_str(&format!("{}\n", "Issues".bold().underline()));
        for issue in &report.issues {
            let location = match issue.line {
                Some(line) => format!("{}:{}", issue.file, line),
                None => issue.file.clone(),
            };
            out.push_str(&format!(
                "  [{}] {:<36} {}\n",
                severity_str(issue.severity),
                issue.rule_id.dimmed(),
                issue.message,
            ));
            out.push_str(&format!("         {}\n", location.dimmed()));
            if let Some(ref suggestion) = issue.suggestion {
                out.push_str(&format!("         > {}\n", suggestion.dimmed()));
            }
        }
        out.push('\n');
    }

    if !report.suppressed.is_empty() {
        out.push_str(&format!(
            "{} ({} suppressed)\n",
            "Suppressed".bold().underline(),
            report.suppressed.len()
        ));
        for issue in &report.suppressed {
            let reason = issue
                .suppression_reason
                .as_deref()
                .unwrap_or("no reason given");
            out.push_str(&format!(
                "  [SKIP] {:<36} {}\n",
                issue.rule_id.dimmed(),
                reason.dimmed(),
            ));
        }
        out.push('\n');
    }

    let (errors, warnings, info) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {}  |  {} errors, {} warnings, {} info, {} suppressed\n",
        status_str(report.status),
        errors,
        warnings,
        info,
        report.suppressed.len(),
    ));
    out
}

// ----- Helper -----

fn header(title: &str) -> String {
    format!("\n{}\n", format!("  {title}  ").bold().on_blue().white())
}

fn push_findings(out: &mut String, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    out.push_str(&format!("{}\n", "Findings".bold().underline()));
    for finding in findings {
        out.push_str(&format!(
            "  [{}] {:<36} {}\n",
            severity_str(finding.severity),
            finding.rule_id.dimmed(),
            finding.message,
        ));
    }
    out.push('\n');
}

fn severity_str(severity: Severity) -> String {
    match severity {
        Severity::Error => "ERROR".red().bold().to_string(),
        Severity::Warning => " WARN".yellow().bold().to_string(),
        Severity::Info => " INFO".blue().to_string(),
    }
}

fn status_str(status: Status) -> String {
    match status {
        Status::Passed => "PASSED".green().bold().to_string(),
        Status::Warning => "WARNING".yellow().bold().to_string(),
        Status::Failed => "FAILED".red().bold().to_string(),
    }
}

fn score_str(score: f64) -> colored::ColoredString {
    let text = format!("{score:.2}/5.00");
    if score >= 4.5 {
        text.green()
    } else if score >= 3.0 {
        text.yellow()
    } else {
        text.red()
    }
}
