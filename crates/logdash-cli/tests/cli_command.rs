use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_logdash_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("logdash")
}

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("csv"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_analyze_json_output() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("analyze")
        .arg(fixture_path("access_timed.log"))
        .arg("--start")
        .arg("2024-02-19 00:00:00")
        .arg("--end")
        .arg("2024-02-19 01:00:00")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["total_requests"], 5);
    assert_eq!(report["top_request_uris"][0]["key"], "/a");
}

#[test]
fn test_analyze_window_from_environment() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.env("LOGDASH_START", "2024-02-19 10:00:00")
        .env("LOGDASH_END", "2024-02-19 11:00:00")
        .env("LOGDASH_LOG_FORMAT", "combined")
        .arg("analyze")
        .arg(fixture_path("access_combined.log"))
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("section,key,count"))
        .stdout(predicate::str::contains("total,requests,3"));
}

#[test]
fn test_analyze_rejects_reversed_window() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("analyze")
        .arg(fixture_path("access_timed.log"))
        .arg("--start")
        .arg("2024-02-19 01:00:00")
        .arg("--end")
        .arg("2024-02-19 00:00:00");

    cmd.assert().failure();
}

#[test]
fn test_analyze_rejects_malformed_bound() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("analyze")
        .arg(fixture_path("access_timed.log"))
        .arg("--start")
        .arg("19/02/2024")
        .arg("--end")
        .arg("2024-02-19 00:00:00");

    cmd.assert().failure();
}

#[test]
fn test_analyze_requires_window() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.env_remove("LOGDASH_START")
        .env_remove("LOGDASH_END")
        .arg("analyze")
        .arg(fixture_path("access_timed.log"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--start"));
}

#[test]
fn test_csv_command_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.csv");

    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("csv")
        .arg(fixture_path("access_timed.log"))
        .arg("-o")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 6 rows"));
    assert!(output.exists());
}

#[test]
fn test_completion_bash() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_logdash()"));
}

#[test]
fn test_unknown_log_format_rejected() {
    let mut cmd = Command::new(get_logdash_bin());
    cmd.arg("csv")
        .arg(fixture_path("access_timed.log"))
        .arg("--log-format")
        .arg("json");

    cmd.assert().failure();
}
