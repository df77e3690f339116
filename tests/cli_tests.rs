//! CLI smoke tests that run the binary without touching the network.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
    let db_path = dir.path().join("oddsedge.db");
    let config = format!("database = \"{}\"\n{extra}", db_path.display());
    let path = dir.path().join("config.toml");
    fs::write(&path, config).expect("write temp config");
    path
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("oddsedge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("settle"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_config_accepts_a_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    Command::cargo_bin("oddsedge")
        .unwrap()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn check_config_rejects_a_zero_interval() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[scanner]\nscan_interval_secs = 0\n");

    Command::cargo_bin("oddsedge")
        .unwrap()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan_interval_secs"));
}

#[test]
fn check_config_rejects_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[scanner\n").unwrap();

    Command::cargo_bin("oddsedge")
        .unwrap()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn stats_on_a_fresh_database_reports_nothing_recorded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    Command::cargo_bin("oddsedge")
        .unwrap()
        .args(["stats", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No opportunities recorded yet"));
}

#[test]
fn settle_unknown_fingerprint_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    Command::cargo_bin("oddsedge")
        .unwrap()
        .args(["settle", "--config"])
        .arg(&path)
        .args(["ev-x|three_way|a@b+c@d+e@f", "--confirmed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no ledger entry"));
}

#[test]
fn scan_without_api_key_names_the_missing_variable() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    Command::cargo_bin("oddsedge")
        .unwrap()
        .env_remove("ODDS_API_KEY")
        .args(["scan", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ODDS_API_KEY"));
}
