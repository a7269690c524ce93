//! Wrong agent install paths anywhere in a document.

use crate::finding::{ConsistencyIssue, Severity};
use crate::schema::{CORRECT_AGENT_PATH, INCORRECT_AGENT_PATHS};

/// One `consistency/incorrect-path` error per line and wrong path found.
pub fn check_paths(file: &str, lines: &[&str]) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        for wrong in INCORRECT_AGENT_PATHS {
            if line.contains(wrong) {
                issues.push(ConsistencyIssue::new(
                    "consistency/incorrect-path",
                    Severity::Error,
                    file,
                    Some(idx + 1),
                    format!("Incorrect path '{wrong}' found"),
                    Some(format!("Change to '{CORRECT_AGENT_PATH}'")),
                ));
            }
        }
    }
    issues
}
