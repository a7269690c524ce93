//! Audit orchestration.
//!
//! [`run_audit`] loads one agent document, evaluates every enabled
//! [`Rule`](crate::rules::Rule) in parallel via [rayon], and assembles the
//! score card, risk tier and findings into an [`AuditReport`].

use crate::config::Config;
use crate::document::{Document, DocumentError};
use crate::finding::{agent_name, AuditReport, ScoreCard, Verdict};
use crate::rules::{self, CategoryResult, RuleContext, MAX_SCORE};
use crate::score;
use rayon::prelude::*;
use std::path::Path;

/// Runs a complete heuristic audit on the document at `path`.
///
/// # Errors
///
/// Returns a [`DocumentError`] when the file cannot be read or has no valid
/// metadata block. Rule evaluation itself cannot fail.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use oxidized_agents::{audit, config::Config};
///
/// let config = Config::load(None).unwrap();
/// let report = audit::run_audit(Path::new("agent/reviewer.md"), &config).unwrap();
/// println!("{} scored {:.2}", report.agent, report.overall_score);
/// ```
pub fn run_audit(path: &Path, config: &Config) -> Result<AuditReport, DocumentError> {
    let doc = Document::load(path)?;
    Ok(audit_document(&doc, config))
}

/// Audits an already-extracted document.
///
/// Disabled categories keep the ceiling score and emit no findings, so the
/// score card always has one entry per scored category.
pub fn audit_document(doc: &Document, config: &Config) -> AuditReport {
    let ctx = RuleContext::new(&doc.metadata, doc.body());

    // par_iter + collect keeps the registration order of the rules.
    let results: Vec<CategoryResult> = rules::all_rules()
        .par_iter()
        .map(|rule| {
            if config.is_category_enabled(rule.category()) {
                rule.evaluate(&ctx)
            } else {
                CategoryResult {
                    category: rule.category(),
                    score: MAX_SCORE,
                    findings: vec![],
                }
            }
        })
        .collect();

    let mut scores = ScoreCard::default();
    let mut findings = Vec::new();
    for result in results {
        scores.insert(result.category, result.score);
        findings.extend(result.findings);
    }

    let overall_score = score::overall_score(&scores);
    let risk_level = score::assess_risk(&ctx);
    tracing::debug!(
        path = %doc.path.display(),
        overall_score,
        risk = %risk_level,
        "audit complete"
    );

    AuditReport {
        agent: agent_name(&doc.path),
        path: doc.path.clone(),
        audit_timestamp: chrono::Utc::now().to_rfc3339(),
        overall_score,
        risk_level,
        verdict: Verdict::from_score(overall_score),
        scores,
        findings,
    }
}
