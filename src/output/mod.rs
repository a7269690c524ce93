//! Output formatting for audit, validation and consistency reports.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::finding::{AuditReport, ConsistencyReport, ValidationReport};

/// Supported output formats.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats an [`AuditReport`] in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use oxidized_agents::output::{format_audit, OutputFormat};
/// # use oxidized_agents::finding::AuditReport;
/// # fn example(report: &AuditReport) {
/// let json = format_audit(report, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_audit(report: &AuditReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::audit(report),
        OutputFormat::Json => json::audit(report),
        OutputFormat::Sarif => sarif::audit(report),
    }
}

/// Formats a [`ValidationReport`] in the requested [`OutputFormat`].
pub fn format_validation(report: &ValidationReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::validation(report),
        OutputFormat::Json => json::validation(report),
        OutputFormat::Sarif => sarif::validation(report),
    }
}

/// Formats a [`ConsistencyReport`] in the requested [`OutputFormat`].
pub fn format_consistency(report: &ConsistencyReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::consistency(report),
        OutputFormat::Json => json::consistency(report),
        OutputFormat::Sarif => sarif::consistency(report),
    }
}
