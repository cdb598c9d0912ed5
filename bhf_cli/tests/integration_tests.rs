//! Integration tests for the bhf binary.
//!
//! These tests verify end-to-end behavior including:
//! - Synthetic sample recording
//! - Weekly/daily summary display
//! - Progress view and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bhf"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Brain Heart Fitness heart-rate zone tracker",
        ));
}

#[test]
fn test_record_creates_sample_store() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--hours")
        .arg("2")
        .arg("--seed")
        .arg("42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded"));

    let store_path = data_dir.join("samples.jsonl");
    let contents = fs::read_to_string(&store_path).expect("Failed to read store");
    assert!(!contents.is_empty());
    // 2 hours at 5-minute intervals, endpoints inclusive
    assert_eq!(contents.lines().count(), 25);

    // Every line is a well-formed sample
    let first: serde_json::Value =
        serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert!(first["timestamp_ms"].is_i64());
    assert_eq!(first["source"], "synthetic");
}

#[test]
fn test_week_summary_from_recorded_data() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--hours")
        .arg("4")
        .arg("--seed")
        .arg("7")
        .assert()
        .success();

    cli()
        .arg("week")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("THIS WEEK"))
        .stdout(predicate::str::contains("Total active minutes"))
        .stdout(predicate::str::contains("Zone 2+ minutes"));
}

#[test]
fn test_week_summary_synthetic() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("week")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--synthetic")
        .arg("--seed")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total active minutes"))
        .stdout(predicate::str::contains("Aerobic Base"));
}

#[test]
fn test_day_summary_with_explicit_date() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("day")
        .arg("--date")
        .arg("2024-06-10")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--synthetic")
        .arg("--seed")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10"));
}

#[test]
fn test_day_rejects_invalid_date() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("day")
        .arg("--date")
        .arg("not-a-date")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--synthetic")
        .assert()
        .failure();
}

#[test]
fn test_progress_shows_seven_days() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--synthetic")
        .arg("--seed")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zone 2+ minutes this week"))
        .get_output()
        .clone();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let day_rows = stdout
        .lines()
        .filter(|line| line.contains("min "))
        .count();
    assert_eq!(day_rows, 7);
}

#[test]
fn test_zones_table_display() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("zones")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovery"))
        .stdout(predicate::str::contains("VO2 Max"));
}

#[test]
fn test_zones_derived_from_max_hr() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("zones")
        .arg("--max-hr")
        .arg("190")
        .arg("--resting-hr")
        .arg("55")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("190"));
}

#[test]
fn test_export_writes_csv_files() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--synthetic")
        .arg("--seed")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let out_dir = data_dir.join("export");
    assert!(out_dir.join("sessions.csv").exists());
    assert!(out_dir.join("zones.csv").exists());
    assert!(out_dir.join("progress.csv").exists());

    let zones_csv = fs::read_to_string(out_dir.join("zones.csv")).unwrap();
    assert!(zones_csv.contains("zone_id,minutes"));
}
