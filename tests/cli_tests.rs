//! Integration tests for the focalcov CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn focalcov_cmd() -> Command {
    let mut cmd = Command::cargo_bin("focalcov").unwrap();
    cmd.env_remove("FOCALCOV_ORACLE_URL").env_remove("RUST_LOG");
    cmd
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/guess-the-number")
}

#[test]
fn test_help_lists_commands() {
    focalcov_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("coverage-samples"))
        .stdout(predicate::str::contains("focal-methods"));
}

#[test]
fn test_print_default_config() {
    focalcov_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("oracle:"))
        .stdout(predicate::str::contains("http://localhost:8080"))
        .stdout(predicate::str::contains("test_annotation:"))
        .stdout(predicate::str::contains("@Test"));
}

#[test]
fn test_validate_config() {
    let dir = tempdir().unwrap();
    let valid = dir.path().join("valid.yml");
    fs::write(
        &valid,
        "oracle:\n  backend: cli\n  script_path: /opt/code-cov-cli\nsink:\n  limit: 10\n",
    )
    .unwrap();

    focalcov_cmd()
        .args(["validate-config", "--config"])
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("cli (/opt/code-cov-cli)"));

    let invalid = dir.path().join("invalid.yml");
    fs::write(&invalid, "oracle:\n  timeout_secs: 0\n").unwrap();
    focalcov_cmd()
        .args(["validate-config", "--config"])
        .arg(&invalid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_repositories_command_deduplicates() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("the-stack.jsonl");
    let output = dir.path().join("out/repositories.jsonl");
    fs::write(
        &input,
        concat!(
            r#"{"max_stars_repo_name":"user1/repo1","max_stars_count":3}"#,
            "\n",
            r#"{"max_stars_repo_name":"user2/repo2","max_stars_count":1}"#,
            "\n",
            r#"{"max_stars_repo_name":"user1/repo1","max_stars_count":3}"#,
            "\n",
        ),
    )
    .unwrap();

    focalcov_cmd()
        .arg("repositories")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 2 record(s)"));

    let lines: Vec<serde_json::Value> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["repository_name"], "user1/repo1");
    assert_eq!(lines[0]["repository_url"], "https://github.com/user1/repo1");
    assert_eq!(lines[1]["repository_url"], "https://github.com/user2/repo2");
}

#[test]
fn test_copy_honors_limit() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.jsonl");
    let output = dir.path().join("copy.jsonl");
    fs::write(&input, "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n").unwrap();

    focalcov_cmd()
        .arg("copy")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--limit", "2"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"a\":1}\n{\"a\":2}\n");
}

#[test]
fn test_parse_command() {
    focalcov_cmd()
        .arg("parse")
        .arg(fixture().join("src/main/java/com/example/guess/logic/Referee.java"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"identifier\":\"Referee\""))
        .stdout(predicate::str::contains("\"package\":\"com.example.guess.logic\""))
        .stdout(predicate::str::contains("\"identifier\":\"isSolved\""));
}

#[test]
fn test_parse_command_rejects_missing_package() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Loose.java");
    fs::write(&file, "public class Loose {\n    void run() {}\n}\n").unwrap();

    focalcov_cmd().arg("parse").arg(&file).assert().failure();
}

#[test]
fn test_focal_methods_command() {
    let assert = focalcov_cmd()
        .arg("focal-methods")
        .arg(fixture())
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let samples: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["focal_method"]["identifier"], "judge");
    assert_eq!(samples[0]["test_methods"][1]["identifier"], "judgeTooHigh");
    assert!(samples[0]["test_methods"][0].get("class").is_none());
    assert!(samples[0]["focal_method"].get("class").is_none());
}

#[test]
fn test_coverage_samples_skips_unreachable_repository() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("repositories.jsonl");
    let output = dir.path().join("samples.jsonl");
    let missing = dir.path().join("no-such-origin");
    fs::write(
        &input,
        format!(
            "{}\n",
            serde_json::json!({
                "repository_name": "example/missing",
                "repository_url": missing.to_string_lossy(),
            })
        ),
    )
    .unwrap();

    focalcov_cmd()
        .arg("coverage-samples")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--work-dir")
        .arg(dir.path().join("work"))
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 0 record(s)"))
        .stdout(predicate::str::contains("1 failed"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}
