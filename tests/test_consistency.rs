use std::path::Path;

use oxidized_agents::config::Config;
use oxidized_agents::consistency::{check_tree, ScanError};
use oxidized_agents::finding::{ConsistencyReport, Severity, SeverityCounts, Status};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}

fn scan(dir: &TempDir) -> ConsistencyReport {
    check_tree(dir.path(), &Config::default()).unwrap()
}

fn rule_ids(report: &ConsistencyReport) -> Vec<&str> {
    report.issues.iter().map(|i| i.rule_id.as_str()).collect()
}

const INDEX: &str = "# Index\n";

// ---------------------------------------------------------------------------
// Deprecated fields
// ---------------------------------------------------------------------------

#[test]
fn skills_in_yaml_example_is_error_with_runtime_hint() {
    let dir = tree(&[(
        "SKILL.md",
        "# Index\n\n```yaml\ndescription: x\nskills:\n  - a\n```\n",
    )]);
    let report = scan(&dir);

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.rule_id, "consistency/deprecated-field");
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.message, "Deprecated field 'skills:' found in YAML example");
    assert!(issue.suggestion.as_deref().unwrap().contains("runtime"));
    assert_eq!(issue.file, "SKILL.md");
    assert_eq!(issue.line, Some(5));
    assert!(!report.is_consistent);
    assert_eq!(report.yaml_blocks_checked, 1);
}

#[test]
fn yaml_outside_fences_is_ignored() {
    let dir = tree(&[("SKILL.md", "# Index\n\nname: not a yaml block\n")]);
    let report = scan(&dir);
    assert!(report.issues.is_empty());
    assert_eq!(report.yaml_blocks_checked, 0);
}

#[test]
fn plural_permission_in_nested_file() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        (
            "references/perm.md",
            "# Perm\n\n```yml\ndescription: x\npermissions:\n  bash: ask\n```\n",
        ),
    ]);
    let report = scan(&dir);
    assert_eq!(
        rule_ids(&report),
        vec!["consistency/deprecated-field", "consistency/plural-permission"]
    );
    assert!(report.issues.iter().all(|i| i.file == "references/perm.md"));
    assert!(report.issues.iter().all(|i| i.line == Some(5)));
}

// ---------------------------------------------------------------------------
// Paths and prose
// ---------------------------------------------------------------------------

#[test]
fn incorrect_install_path() {
    let dir = tree(&[("SKILL.md", "# Index\n\nCopy to ~/.claude/agent/ and restart.\n")]);
    let report = scan(&dir);
    assert_eq!(rule_ids(&report), vec!["consistency/incorrect-path"]);
    assert_eq!(report.issues[0].line, Some(3));
    assert_eq!(
        report.issues[0].suggestion.as_deref(),
        Some("Change to '~/.config/opencode/agent/'")
    );
}

#[test]
fn prose_suggesting_skills_is_warning() {
    let dir = tree(&[(
        "SKILL.md",
        "# Index\n\nTo load helpers, add skills: to the frontmatter.\n",
    )]);
    let report = scan(&dir);
    assert_eq!(rule_ids(&report), vec!["consistency/deprecated-reference"]);
    assert_eq!(report.issues[0].severity, Severity::Warning);
    assert!(report.is_consistent);
}

#[test]
fn prose_heuristic_can_be_disabled() {
    let dir = tree(&[(
        "SKILL.md",
        "# Index\n\nTo load helpers, add skills: to the frontmatter.\n",
    )]);
    let mut config = Config::default();
    config.consistency.deprecated_references = false;
    let report = check_tree(dir.path(), &config).unwrap();
    assert!(report.issues.is_empty());
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[test]
fn dangling_link_is_single_warning_with_location() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        ("references/b.md", "# B\n\nSee [missing](./missing.md).\n"),
    ]);
    let report = scan(&dir);

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.rule_id, "consistency/broken-link");
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.file, "references/b.md");
    assert_eq!(issue.line, Some(3));
    assert_eq!(issue.message, "Broken link: [missing](./missing.md)");
    assert_eq!(
        issue.suggestion.as_deref(),
        Some("Verify the file exists at: references/missing.md")
    );
    assert!(report.is_consistent);
    assert_eq!(report.status, Status::Warning);
}

#[test]
fn links_resolve_relative_to_their_document() {
    let dir = tree(&[
        ("SKILL.md", "# Index\n\n[guide](references/guide.md#top)\n"),
        (
            "references/guide.md",
            "[index](../SKILL.md) [script](../scripts/run.sh) [self](#top) [web](https://example.com)\n",
        ),
        ("scripts/run.sh", "echo hi\n"),
    ]);
    let report = scan(&dir);
    assert!(report.issues.is_empty(), "{:?}", rule_ids(&report));
}

#[test]
fn links_in_code_fences_are_ignored() {
    let dir = tree(&[("SKILL.md", "# Index\n\n```markdown\n[x](nope.md)\n```\n")]);
    assert!(scan(&dir).issues.is_empty());
}

#[test]
fn links_escaping_the_root_are_skipped() {
    let dir = tree(&[("SKILL.md", "# Index\n\n[up](../../outside.md)\n")]);
    assert!(scan(&dir).issues.is_empty());
}

// ---------------------------------------------------------------------------
// Section numbering
// ---------------------------------------------------------------------------

#[test]
fn duplicate_section_number_cites_both_lines() {
    let dir = tree(&[(
        "SKILL.md",
        "# Index\n\n### 2. First\n\ntext\n\n### 2. Second\n",
    )]);
    let report = scan(&dir);

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.rule_id, "consistency/duplicate-section");
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.line, Some(7));
    assert_eq!(
        issue.message,
        "Duplicate section number '2.' (first seen at line 3)"
    );
}

#[test]
fn numbering_only_checked_in_index_document() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        ("other.md", "## 1. A\n## 1. B\n"),
    ]);
    assert!(scan(&dir).issues.is_empty());
}

#[test]
fn index_document_is_configurable() {
    let dir = tree(&[("README.md", "## 1. A\n## 1. B\n")]);
    let mut config = Config::default();
    config.consistency.index_document = "README.md".to_string();
    let report = check_tree(dir.path(), &config).unwrap();
    assert_eq!(rule_ids(&report), vec!["consistency/duplicate-section"]);
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[test]
fn missing_root_is_error() {
    let err = check_tree(Path::new("tests/fixtures/no-such-tree"), &Config::default()).unwrap_err();
    assert!(matches!(err, ScanError::MissingRoot(_)));
}

#[test]
fn missing_index_is_error() {
    let dir = tree(&[("other.md", "# Other\n")]);
    let err = check_tree(dir.path(), &Config::default()).unwrap_err();
    assert!(matches!(err, ScanError::MissingIndex { .. }));
    assert!(err.to_string().contains("SKILL.md"));
}

#[test]
fn unreadable_file_is_reported_and_scan_continues() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        ("z.md", "Copy to ~/.claude/agent/\n"),
    ]);
    std::fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

    let report = scan(&dir);
    assert_eq!(
        rule_ids(&report),
        vec!["consistency/unreadable-file", "consistency/incorrect-path"]
    );
    assert_eq!(report.issues[0].file, "bad.md");
    assert_eq!(report.issues[0].line, None);
    assert_eq!(report.files_checked, 3);
}

#[cfg(unix)]
#[test]
fn unwalkable_entry_is_reported_and_scan_continues() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        ("z.md", "Copy to ~/.claude/agent/\n"),
    ]);
    std::os::unix::fs::symlink("nowhere/gone.md", dir.path().join("ghost.md")).unwrap();

    let report = scan(&dir);
    assert_eq!(
        rule_ids(&report),
        vec!["consistency/unreadable-file", "consistency/incorrect-path"]
    );
    assert_eq!(report.issues[0].file, "ghost.md");
    assert_eq!(report.issues[0].line, None);
    assert_eq!(report.issues[0].severity, Severity::Error);
    assert!(!report.is_consistent);
    assert_eq!(report.files_checked, 2);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn issues_sorted_by_file_then_line() {
    let dir = tree(&[
        ("SKILL.md", "# Index\n\n[b](b.md)\n\nSee ~/.config/opencode/agents/\n"),
        ("a.md", "[gone](gone.md)\n"),
    ]);
    let report = scan(&dir);
    let order: Vec<(&str, Option<usize>)> = report
        .issues
        .iter()
        .map(|i| (i.file.as_str(), i.line))
        .collect();
    assert_eq!(
        order,
        vec![("SKILL.md", Some(3)), ("SKILL.md", Some(5)), ("a.md", Some(1))]
    );
}

#[test]
fn severity_views() {
    let report = ConsistencyReport::from_issues(
        Path::new("."),
        0,
        0,
        scan(&tree(&[(
            "SKILL.md",
            "# Index\n\n[gone](gone.md)\n\n```yaml\nname: x\n```\n",
        )]))
        .issues,
        &[],
        false,
    );
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.warnings().len(), 1);
    assert!(report.infos().is_empty());
    assert_eq!(report.count_by_severity(), (1, 1, 0));
}

#[test]
fn suppression_file_moves_issues_aside() {
    let dir = tree(&[
        ("SKILL.md", INDEX),
        ("references/b.md", "# B\n\nSee [missing](./missing.md).\n"),
        (
            ".oxidized-agents-ignore",
            "[[suppress]]\nrule = \"consistency/broken-link\"\nfile = \"references/b.md\"\nlines = \"1-5\"\nreason = \"page removed upstream\"\n",
        ),
    ]);
    let report = scan(&dir);
    assert!(report.issues.is_empty());
    assert_eq!(report.suppressed.len(), 1);
    assert_eq!(
        report.suppressed[0].suppression_reason.as_deref(),
        Some("page removed upstream")
    );
    assert_eq!(report.status, Status::Passed);
}

#[test]
fn strict_mode_fails_on_warnings() {
    let dir = tree(&[("SKILL.md", "# Index\n\n[gone](gone.md)\n")]);
    let mut config = Config::default();
    config.strict.enabled = true;
    let report = check_tree(dir.path(), &config).unwrap();
    assert!(report.is_consistent);
    assert_eq!(report.status, Status::Failed);
}

#[test]
fn repeated_scans_are_identical() {
    let dir = tree(&[
        ("SKILL.md", "# Index\n\n## 1. A\n## 1. B\n[x](x.md)\n"),
        ("a/one.md", "```yaml\nname: a\n```\n"),
        ("b/two.md", "~/.claude/agent/\n"),
        ("c/three.md", "[y](y.md)\n"),
    ]);
    let first = serde_json::to_string(&scan(&dir)).unwrap();
    let second = serde_json::to_string(&scan(&dir)).unwrap();
    assert_eq!(first, second);
}
