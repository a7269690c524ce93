//! Relative Markdown links and the graph used to find dangling ones.
//!
//! Extraction happens per file during the parallel pass; resolution happens
//! once every document in the tree is known, so a link to a sibling that is
//! itself being scanned resolves without touching the disk.

use crate::finding::{ConsistencyIssue, Severity};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// An inline `[text](target)` link outside code fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub target: String,
    /// 1-based line number in the source document.
    pub line: usize,
}

/// Extracts inline links from `lines`, skipping fenced code and images.
///
/// `fenced` must be the [`fence_mask`](super::fence_mask) of `lines`.
pub fn extract_links(lines: &[&str], fenced: &[bool]) -> Vec<LinkRef> {
    let mut links = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if fenced.get(idx).copied().unwrap_or(false) {
            continue;
        }
        for (text, target) in links_in_line(line) {
            links.push(LinkRef {
                text,
                target,
                line: idx + 1,
            });
        }
    }
    links
}

fn links_in_line(line: &str) -> Vec<(String, String)> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'[' || (i > 0 && bytes[i - 1] == b'!') {
            i += 1;
            continue;
        }
        let Some(label_end) = find_byte(bytes, b']', i + 1) else {
            break;
        };
        if bytes.get(label_end + 1) != Some(&b'(') {
            i = label_end + 1;
            continue;
        }
        let Some(target_end) = find_byte(bytes, b')', label_end + 2) else {
            break;
        };

        let text = &line[i + 1..label_end];
        let mut target = line[label_end + 2..target_end].trim();
        // `[x](file.md "Title")`
        if !target.starts_with('<') {
            if let Some((before, _)) = target.split_once(' ') {
                target = before;
            }
        }
        if target.len() >= 2 && target.starts_with('<') && target.ends_with('>') {
            target = &target[1..target.len() - 1];
        }
        if !text.is_empty() && !target.is_empty() {
            out.push((text.to_string(), target.to_string()));
        }
        i = target_end + 1;
    }

    out
}

fn find_byte(bytes: &[u8], target: u8, start: usize) -> Option<usize> {
    bytes
        .get(start..)?
        .iter()
        .position(|b| *b == target)
        .map(|offset| start + offset)
}

/// Every scanned document and the links it contains.
#[derive(Debug)]
pub struct LinkGraph {
    root: PathBuf,
    documents: BTreeSet<String>,
    links: Vec<(String, Vec<LinkRef>)>,
}

impl LinkGraph {
    pub fn new(root: &Path) -> Self {
        LinkGraph {
            root: root.to_path_buf(),
            documents: BTreeSet::new(),
            links: Vec::new(),
        }
    }

    /// Registers `rel` (a `/`-separated path under the root) and its links.
    pub fn add_document(&mut self, rel: &str, links: Vec<LinkRef>) {
        self.documents.insert(rel.to_string());
        if !links.is_empty() {
            self.links.push((rel.to_string(), links));
        }
    }

    /// One `consistency/broken-link` warning per link whose target is missing.
    ///
    /// Links with a URI scheme, pure `#anchor` links, absolute paths and
    /// targets that climb out of the root are not checked.
    pub fn dangling(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();
        for (source, links) in &self.links {
            for link in links {
                let Some(resolved) = resolve(source, &link.target) else {
                    continue;
                };
                if self.exists(&resolved) {
                    continue;
                }
                tracing::debug!(file = %source, target = %link.target, "dangling link");
                issues.push(ConsistencyIssue::new(
                    "consistency/broken-link",
                    Severity::Warning,
                    source,
                    Some(link.line),
                    format!("Broken link: [{}]({})", link.text, link.target),
                    Some(format!("Verify the file exists at: {resolved}")),
                ));
            }
        }
        issues
    }

    fn exists(&self, rel: &str) -> bool {
        self.documents.contains(rel) || self.root.join(rel).exists()
    }
}

/// Resolves `target` against the directory of `source`, both relative to the
/// root. Returns `None` for links that are not checked.
fn resolve(source: &str, target: &str) -> Option<String> {
    if target.starts_with('#')
        || target.starts_with('?')
        || target.starts_with('/')
        || has_uri_scheme(target)
    {
        return None;
    }
    let path_part = target.split(['#', '?']).next().unwrap_or_default();
    if path_part.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = source.split('/').collect();
    parts.pop();
    for segment in path_part.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    Some(parts.join("/"))
}

fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_target_and_line() {
        let lines = ["intro", "See [guide](./guide.md#setup) and ![img](a.png)."];
        let links = extract_links(&lines, &[false, false]);
        assert_eq!(
            links,
            vec![LinkRef {
                text: "guide".into(),
                target: "./guide.md#setup".into(),
                line: 2,
            }]
        );
    }

    #[test]
    fn strips_title_and_angle_brackets() {
        assert_eq!(
            links_in_line(r#"[a](<b c.md>) [d](e.md "Title")"#),
            vec![("a".into(), "b c.md".into()), ("d".into(), "e.md".into())]
        );
    }

    #[test]
    fn resolve_relative_to_source_dir() {
        assert_eq!(
            resolve("references/a.md", "../SKILL.md#top").as_deref(),
            Some("SKILL.md")
        );
        assert_eq!(
            resolve("references/a.md", "./b.md").as_deref(),
            Some("references/b.md")
        );
    }

    #[test]
    fn unchecked_targets() {
        assert_eq!(resolve("a.md", "https://example.com/x.md"), None);
        assert_eq!(resolve("a.md", "mailto:x@y.z"), None);
        assert_eq!(resolve("a.md", "#section"), None);
        assert_eq!(resolve("a.md", "/abs/path.md"), None);
        assert_eq!(resolve("a.md", "../outside.md"), None);
    }
}
