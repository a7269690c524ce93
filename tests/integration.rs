use assert_cmd::Command;
use predicates::prelude::*;

fn oxidized_agents() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("oxidized-agents")
}

// ---------------------------------------------------------------------------
// audit
// ---------------------------------------------------------------------------

#[test]
fn audit_good_agent_succeeds() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/code-reviewer.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code-reviewer"))
        .stdout(predicate::str::contains("EXCELLENT"));
}

#[test]
fn audit_weak_agent_still_exits_0() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/helper.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HIGH"));
}

#[test]
fn audit_json_format() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/helper.md", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"overall_score\": 2.96"))
        .stdout(predicate::str::contains("\"risk_level\": \"HIGH\""));
}

#[test]
fn audit_sarif_format() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/helper.md", "--format", "sarif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""))
        .stdout(predicate::str::contains("tools/bash-no-permission"));
}

#[test]
fn audit_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/helper.md", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"agent\": \"helper\""));
}

#[test]
fn audit_malformed_document_exits_1() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/no-frontmatter.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no valid frontmatter found"));
}

#[test]
fn audit_nonexistent_path_exits_2() {
    oxidized_agents()
        .args(["audit", "tests/fixtures/agents/does-not-exist.md"])
        .assert()
        .code(2);
}

#[test]
fn audit_missing_config_exits_2() {
    oxidized_agents()
        .args([
            "audit",
            "tests/fixtures/agents/helper.md",
            "--config",
            "tests/fixtures/nope.toml",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_good_agent_passes() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/code-reviewer.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn validate_warnings_pass_without_strict() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/helper.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn validate_strict_fails_on_warnings() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/helper.md", "--strict"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn validate_deprecated_fields_fail() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/legacy.md", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("schema/deprecated-field"))
        .stdout(predicate::str::contains("\"is_valid\": false"));
}

#[test]
fn validate_malformed_document_fails() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/no-frontmatter.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("schema/malformed-document"));
}

#[test]
fn validate_nonexistent_path_is_malformed_error() {
    oxidized_agents()
        .args(["validate", "tests/fixtures/agents/missing.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("schema/malformed-document"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_clean_tree_passes() {
    oxidized_agents()
        .args(["check", "tests/fixtures/clean-tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn check_drifted_tree_fails() {
    oxidized_agents()
        .args(["check", "tests/fixtures/tree"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("consistency/deprecated-field"))
        .stdout(predicate::str::contains("consistency/duplicate-section"))
        .stdout(predicate::str::contains("SKILL.md:15"));
}

#[test]
fn check_json_lists_issues_in_order() {
    let output = oxidized_agents()
        .args(["check", "tests/fixtures/tree", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lines: Vec<u64> = parsed["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["line"].as_u64().unwrap())
        .collect();
    assert_eq!(lines, vec![5, 9, 15, 17]);
    assert_eq!(parsed["files_checked"], 3);
    assert_eq!(parsed["yaml_blocks_checked"], 2);
}

#[test]
fn check_sarif_has_regions() {
    oxidized_agents()
        .args(["check", "tests/fixtures/tree", "--format", "sarif"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"startLine\": 17"));
}

#[test]
fn check_without_index_exits_2() {
    oxidized_agents()
        .args(["check", "tests/fixtures/agents"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SKILL.md"));
}

#[test]
fn check_nonexistent_root_exits_2() {
    oxidized_agents()
        .args(["check", "tests/fixtures/nowhere"])
        .assert()
        .code(2);
}

#[test]
fn check_strict_fails_on_broken_link_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("SKILL.md"), "# Index\n\n[gone](gone.md)\n").unwrap();

    oxidized_agents()
        .arg("check")
        .arg(dir.path())
        .assert()
        .success();

    oxidized_agents()
        .arg("check")
        .arg(dir.path())
        .arg("--strict")
        .assert()
        .code(1);
}

// ---------------------------------------------------------------------------
// rule catalogue
// ---------------------------------------------------------------------------

#[test]
fn list_rules_shows_every_group() {
    oxidized_agents()
        .args(["list-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tools/bash-no-permission"))
        .stdout(predicate::str::contains("schema/unknown-tool"))
        .stdout(predicate::str::contains("consistency/broken-link"));
}

#[test]
fn list_rules_describes_scored_groups() {
    oxidized_agents()
        .args(["list-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Section structure, code examples, workflow and instruction length",
        ))
        .stdout(predicate::str::contains(
            "Description detail, examples, trigger phrases and execution mode",
        ));
}

#[test]
fn explain_known_rule() {
    oxidized_agents()
        .args(["explain", "security/bash-few-safety-keywords"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deduction:    1.5"));
}

#[test]
fn explain_unknown_rule_exits_2() {
    oxidized_agents()
        .args(["explain", "nope/never"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule"));
}
