//! Prose that may still recommend the retired `skills:` field.
//!
//! This is a text heuristic, not a parser. A line mentioning `skills:` is
//! flagged when the surrounding lines talk about adding it to metadata and
//! nothing nearby says it is deprecated. Expect false positives and
//! negatives; the check only ever produces warnings and can be disabled with
//! `consistency.deprecated_references = false`.

use crate::finding::{ConsistencyIssue, Severity};

/// Lines on either side of the mention that form its context.
const WINDOW: usize = 3;

/// Context words meaning the text already explains the deprecation.
const EXPLAINED: &[&str] = &["deprecated", "runtime", "not"];

/// Context words meaning the text is about writing metadata.
const SUGGESTS: &[&str] = &["frontmatter", "yaml", "add"];

/// Flags suspicious `skills:` mentions outside code fences and headings.
///
/// `fenced` must be the [`fence_mask`](super::fence_mask) of `lines`.
pub fn check_deprecated_references(
    file: &str,
    lines: &[&str],
    fenced: &[bool],
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if fenced.get(idx).copied().unwrap_or(false) || line.trim_start().starts_with('#') {
            continue;
        }
        if !line.to_lowercase().contains("skills:") {
            continue;
        }

        let start = idx.saturating_sub(WINDOW);
        let end = (idx + WINDOW + 1).min(lines.len());
        let context = lines[start..end].join(" ").to_lowercase();

        if EXPLAINED.iter().any(|w| context.contains(w)) {
            continue;
        }
        if SUGGESTS.iter().any(|w| context.contains(w)) {
            issues.push(ConsistencyIssue::new(
                "consistency/deprecated-reference",
                Severity::Warning,
                file,
                Some(idx + 1),
                "Possible reference to deprecated 'skills:' field usage",
                Some("Verify this doesn't suggest using skills: in frontmatter".to_string()),
            ));
        }
    }
    issues
}
