//! SARIF 2.1.0 formatter.
//!
//! Rule metadata comes from [`catalog`](crate::rules::catalog); results carry
//! the document (or tree-relative file) as their artifact location.

use crate::finding::{AuditReport, ConsistencyReport, Severity, ValidationReport};
use crate::rules::{catalog, RuleInfo};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::{BTreeSet, HashMap};

/// One SARIF result before conversion.
struct Entry<'a> {
    rule_id: &'a str,
    severity: Severity,
    message: &'a str,
    uri: String,
    line: Option<usize>,
}

pub fn audit(report: &AuditReport) -> String {
    let uri = uri_of(&report.path);
    render(report.findings.iter().map(|f| Entry {
        rule_id: &f.rule_id,
        severity: f.severity,
        message: &f.message,
        uri: uri.clone(),
        line: None,
    }))
}

pub fn validation(report: &ValidationReport) -> String {
    let uri = uri_of(&report.path);
    render(report.findings.iter().map(|f| Entry {
        rule_id: &f.rule_id,
        severity: f.severity,
        message: &f.message,
        uri: uri.clone(),
        line: None,
    }))
}

/// Suppressed issues are left out; SARIF consumers have their own baselines.
pub fn consistency(report: &ConsistencyReport) -> String {
    render(report.issues.iter().map(|i| Entry {
        rule_id: &i.rule_id,
        severity: i.severity,
        message: &i.message,
        uri: i.file.clone(),
        line: i.line,
    }))
}

fn render<'a>(entries: impl Iterator<Item = Entry<'a>>) -> String {
    let entries: Vec<Entry<'a>> = entries.collect();
    let known: HashMap<&str, RuleInfo> = catalog().into_iter().map(|r| (r.id, r)).collect();

    let rule_ids: Vec<&str> = entries
        .iter()
        .map(|e| e.rule_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rule_index: HashMap<&str, i64> = rule_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_ids
        .iter()
        .map(|id| {
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            if let Some(info) = known.get(id) {
                rule.short_description = Some(
                    MultiformatMessageString::builder()
                        .text(info.message.to_string())
                        .build(),
                );
                rule.help = Some(
                    MultiformatMessageString::builder()
                        .text(info.remediation.to_string())
                        .build(),
                );
            }
            rule
        })
        .collect();

    let results: Vec<SarifResult> = entries
        .iter()
        .map(|e| {
            let level = match e.severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warning => ResultLevel::Warning,
                Severity::Info => ResultLevel::Note,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(e.message.to_string()).build())
                .build();
            result.rule_id = Some(e.rule_id.to_string());
            result.level = Some(level);
            result.rule_index = rule_index.get(e.rule_id).copied();

            let mut physical = PhysicalLocation::builder().build();
            physical.artifact_location = Some(ArtifactLocation::builder().uri(e.uri.clone()).build());
            if let Some(line) = e.line {
                physical.region = Some(Region::builder().start_line(line as i64).build());
            }
            let mut location = Location::builder().build();
            location.physical_location = Some(physical);
            result.locations = Some(vec![location]);

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("oxidized-agents")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();
    let run = Run::builder().tool(tool).results(results).build();
    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}

fn uri_of(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
