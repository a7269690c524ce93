//! Deprecated fields inside fenced YAML examples.
//!
//! | ID | Sev | Pattern |
//! |----|-----|---------|
//! | `consistency/deprecated-field` | Error | `name:`, `skills:`, `permissions:` at line start |
//! | `consistency/plural-permission` | Error | first `permissions:` in a block |

use crate::finding::{ConsistencyIssue, Severity};
use crate::schema::{deprecation_suggestion, DEPRECATED_FIELDS};
use regex::Regex;
use std::sync::LazyLock;

static RE_YAML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```ya?ml[ \t]*\r?\n(.*?)```").unwrap());

static RE_PLURAL_PERMISSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*permissions:").unwrap());

static RE_DEPRECATED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    DEPRECATED_FIELDS
        .iter()
        .map(|field| {
            let pattern = format!(r"(?m)^[ \t]*{}:", regex::escape(field));
            (*field, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Scans every ```` ```yaml ```` / ```` ```yml ```` block in `content`.
///
/// Returns the issues found and the number of blocks inspected. Line numbers
/// are 1-based and point at the offending line in the file, not the block.
pub fn check_yaml_blocks(file: &str, content: &str) -> (Vec<ConsistencyIssue>, usize) {
    let mut issues = Vec::new();
    let mut blocks = 0;

    for caps in RE_YAML_BLOCK.captures_iter(content) {
        let Some(yaml) = caps.get(1) else { continue };
        blocks += 1;
        let first_line = line_of(content, yaml.start());
        let block = yaml.as_str();

        for (field, re) in RE_DEPRECATED.iter() {
            for m in re.find_iter(block) {
                issues.push(ConsistencyIssue::new(
                    "consistency/deprecated-field",
                    Severity::Error,
                    file,
                    Some(first_line + block[..m.start()].matches('\n').count()),
                    format!("Deprecated field '{field}:' found in YAML example"),
                    Some(deprecation_suggestion(field)),
                ));
            }
        }

        if let Some(m) = RE_PLURAL_PERMISSION.find(block) {
            issues.push(ConsistencyIssue::new(
                "consistency/plural-permission",
                Severity::Error,
                file,
                Some(first_line + block[..m.start()].matches('\n').count()),
                "Field 'permissions:' should be 'permission:' (singular)",
                Some("Change 'permissions:' to 'permission:'".to_string()),
            ));
        }
    }

    (issues, blocks)
}

/// 1-based line number of byte `offset`.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}
