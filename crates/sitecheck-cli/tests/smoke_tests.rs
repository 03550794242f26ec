//! Smoke tests for the sitecheck CLI
//!
//! These tests run the real binary against temporary data files.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the sitecheck binary
fn sitecheck() -> Command {
    let mut cmd = Command::cargo_bin("sitecheck").expect("sitecheck binary should exist");
    cmd.env_remove("SLACK_WEBHOOK_URL").env_remove("RUST_LOG");
    cmd
}

const CSV: &str = "TestName,Website,ExpectedTitle,ButtonText,Environment,Priority\n\
GitHub Home,GitHub,GitHub,Sign up,dev,high\n\
JUnit Home,JUnit,JUnit,,dev,medium\n\
Maven Prod,Maven,,,prod,low\n";

const LINKS: &str = r#"[
  {"name": "Example", "url": "https://example.com", "expectedTitle": "Example Domain"}
]"#;

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tests.csv"), CSV).unwrap();
    fs::write(dir.path().join("links.json"), LINKS).unwrap();
    dir
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    sitecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    sitecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("perf"));
}

#[test]
fn test_no_args_shows_help() {
    sitecheck().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    sitecheck()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--junit"));
}

// ============================================================================
// Data Commands
// ============================================================================

#[test]
fn test_validate_good_sources() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args(["--color", "never", "validate", "--data", "tests.csv", "links.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tests.csv: 3 records (csv)"));
}

#[test]
fn test_validate_missing_source_fails() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args(["validate", "--data", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_data_lists_filtered_records() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args(["data", "--data", "tests.csv", "--env", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maven Prod"))
        .stdout(predicate::str::contains("1 records"));
}

#[test]
fn test_data_json_output() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args(["data", "-d", "links.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"testName\": \"Example_JSON_Test\""));
}

// ============================================================================
// Run Command
// ============================================================================

#[test]
fn test_dry_run_passes_and_writes_reports() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args([
            "--color",
            "never",
            "run",
            "--data",
            "tests.csv",
            "links.json",
            "--dry-run",
            "--no-screenshots",
            "--html",
            "reports/report.html",
            "--junit",
            "reports/junit.xml",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED"));

    let html = fs::read_to_string(dir.path().join("reports/report.html")).unwrap();
    assert!(html.contains("GitHub HomePage Verification"));
    assert!(dir.path().join("reports/junit.xml").exists());
}

#[test]
fn test_dry_run_smoke_selects_high_priority() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args([
            "--color", "never", "run", "-d", "tests.csv", "--smoke", "--dry-run", "--no-screenshots",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("across 1 records"));
}

#[test]
fn test_run_unknown_environment_fails() {
    let dir = data_dir();
    sitecheck()
        .current_dir(dir.path())
        .args(["run", "-d", "tests.csv", "--env", "qa", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no test data selected"));
}

#[test]
fn test_run_requires_data() {
    sitecheck().args(["run"]).assert().failure();
}
