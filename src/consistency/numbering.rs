//! Duplicate heading numbers in the index document.

use super::fence_mask;
use crate::finding::{ConsistencyIssue, Severity};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,4})\s*(\d+)\.\s+(.+)").unwrap());

/// Flags every numbered heading (levels 2 to 4) whose number was already used
/// at the same level. Headings inside code fences are ignored.
pub fn check_section_numbering(file: &str, content: &str) -> Vec<ConsistencyIssue> {
    let lines: Vec<&str> = content.split('\n').collect();
    let fenced = fence_mask(&lines);
    let mut seen: HashMap<(usize, &str), usize> = HashMap::new();
    let mut issues = Vec::new();

    for (idx, &line) in lines.iter().enumerate() {
        if fenced[idx] {
            continue;
        }
        let Some(caps) = RE_NUMBERED_HEADING.captures(line) else {
            continue;
        };
        let level = caps[1].len();
        let Some(number) = caps.get(2).map(|m| m.as_str()) else {
            continue;
        };
        let line_no = idx + 1;

        match seen.get(&(level, number)) {
            Some(first) => issues.push(ConsistencyIssue::new(
                "consistency/duplicate-section",
                Severity::Error,
                file,
                Some(line_no),
                format!("Duplicate section number '{number}.' (first seen at line {first})"),
                Some("Renumber sections sequentially".to_string()),
            )),
            None => {
                seen.insert((level, number), line_no);
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_at_same_level() {
        let content = "# T\n### 2. A\ntext\n### 2. B\n";
        let issues = check_section_numbering("SKILL.md", content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, Some(4));
        assert_eq!(
            issues[0].message,
            "Duplicate section number '2.' (first seen at line 2)"
        );
    }

    #[test]
    fn levels_are_independent() {
        let content = "## 1. Top\n### 1. Sub\n#### 1. Deep\n";
        assert!(check_section_numbering("SKILL.md", content).is_empty());
    }

    #[test]
    fn fenced_headings_ignored() {
        let content = "## 1. A\n```\n## 1. A\n```\n";
        assert!(check_section_numbering("SKILL.md", content).is_empty());
    }
}
