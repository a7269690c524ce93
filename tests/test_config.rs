use oxidized_agents::config::{load_suppressions, Config, SUPPRESSION_FILE};
use oxidized_agents::finding::Category;

// ---------------------------------------------------------------------------
// Config::load
// ---------------------------------------------------------------------------

#[test]
fn defaults_enable_everything() {
    let config = Config::default();
    assert!(!config.strict.enabled);
    for category in Category::SCORED {
        assert!(config.is_category_enabled(category));
    }
    assert_eq!(config.consistency.index_document, "SKILL.md");
    assert!(config.consistency.deprecated_references);
}

#[test]
fn explicit_missing_file_is_error() {
    let err = Config::load(Some(std::path::Path::new("tests/fixtures/nope.toml"))).unwrap_err();
    assert!(err.contains("Config file not found"));
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oxidized-agents.toml");
    std::fs::write(
        &path,
        "[rules]\nsecurity = false\n\n[consistency]\nindex_document = \"INDEX.md\"\n",
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert!(!config.is_category_enabled(Category::Security));
    assert!(config.is_category_enabled(Category::ToolSafety));
    assert!(config.is_category_enabled(Category::Schema));
    assert_eq!(config.consistency.index_document, "INDEX.md");
    assert!(config.consistency.deprecated_references);
    assert!(!config.strict.enabled);
}

#[test]
fn invalid_toml_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[strict\nenabled = true\n").unwrap();
    let err = Config::load(Some(path.as_path())).unwrap_err();
    assert!(err.contains("Failed to parse config"));
}

// ---------------------------------------------------------------------------
// Suppressions
// ---------------------------------------------------------------------------

#[test]
fn no_suppression_file_means_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_suppressions(dir.path()).is_empty());
}

#[test]
fn suppressions_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(SUPPRESSION_FILE),
        r#"
[[suppress]]
rule = "consistency/incorrect-path"
file = "history.md"
reason = "Changelog quotes the old path"
ticket = "DOC-12"

[[suppress]]
rule = "consistency/broken-link"
file = ""
lines = "10-20"
reason = "Generated section"
"#,
    )
    .unwrap();

    let suppressions = load_suppressions(dir.path());
    assert_eq!(suppressions.len(), 2);
    assert_eq!(suppressions[0].ticket.as_deref(), Some("DOC-12"));
    assert_eq!(suppressions[1].lines.as_deref(), Some("10-20"));
}

#[test]
fn malformed_suppression_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(SUPPRESSION_FILE), "[[suppress]]\nrule = 1\n").unwrap();
    assert!(load_suppressions(dir.path()).is_empty());
}
