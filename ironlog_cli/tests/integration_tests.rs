//! Integration tests for the ironlog binary.
//!
//! These tests verify end-to-end behavior through the CLI:
//! - Catalog and plan management
//! - The session lifecycle with live tonnage
//! - History listing and CSV export
//! - Per-user data isolation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to run the CLI against a data directory
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ironlog"));
    cmd.arg("--data-dir").arg(data_dir).arg("--user").arg("test");
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("ironlog"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength training session tracker"));
}

#[test]
fn test_exercise_add_and_list() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercise", "add", "Bench Press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added exercise 'Bench Press'"));

    cli(dir)
        .args(["exercise", "add", "Pull Up", "--kind", "bodyweight"])
        .assert()
        .success();

    cli(dir)
        .args(["exercise", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("Pull Up"))
        .stdout(predicate::str::contains("bodyweight"));
}

#[test]
fn test_duplicate_exercise_rejected() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercise", "add", "Squat"])
        .assert()
        .success();

    cli(dir)
        .args(["exercise", "add", "Squat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_full_session_flow_with_tonnage() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercise", "add", "Bench Press"])
        .assert()
        .success();
    cli(dir)
        .args(["plan", "create", "Push Day"])
        .assert()
        .success();
    cli(dir)
        .args(["plan", "add", "Push Day", "Bench Press", "--sets", "3", "--reps", "8"])
        .assert()
        .success();

    cli(dir)
        .args(["session", "start", "Push Day", "--body-weight", "180"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started session from 'Push Day'"));

    cli(dir)
        .args(["session", "log", "Bench Press", "--reps", "8", "--weight", "135"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1080.0"));

    cli(dir)
        .args(["session", "log", "Bench Press", "--reps", "8", "--weight", "140"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2200.0"));

    cli(dir)
        .args(["session", "complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2200.0"));

    // The completed session is frozen; there is no active session to log to
    cli(dir)
        .args(["session", "log", "Bench Press", "--reps", "8", "--weight", "145"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active workout session"));
}

#[test]
fn test_second_session_rejected_while_active() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir).args(["plan", "create", "Push Day"]).assert().success();
    cli(dir).args(["plan", "create", "Pull Day"]).assert().success();

    cli(dir)
        .args(["session", "start", "Push Day"])
        .assert()
        .success();

    cli(dir)
        .args(["session", "start", "Pull Day"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("active workout session"));
}

#[test]
fn test_cancel_discards_session() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir).args(["exercise", "add", "Squat"]).assert().success();
    cli(dir).args(["plan", "create", "Leg Day"]).assert().success();
    cli(dir).args(["session", "start", "Leg Day"]).assert().success();
    cli(dir)
        .args(["session", "log", "Squat", "--reps", "5", "--weight", "225"])
        .assert()
        .success();

    cli(dir)
        .args(["session", "cancel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelled"));

    cli(dir)
        .args(["session", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active workout session"));

    cli(dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions yet"));
}

#[test]
fn test_bodyweight_tonnage_recomputes() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercise", "add", "Pull Up", "--kind", "bodyweight"])
        .assert()
        .success();
    cli(dir).args(["plan", "create", "Pull Day"]).assert().success();
    cli(dir)
        .args(["session", "start", "Pull Day", "--body-weight", "180"])
        .assert()
        .success();

    cli(dir)
        .args(["session", "log", "Pull Up", "--reps", "5", "--weight", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("900.0"));

    cli(dir)
        .args(["session", "body-weight", "175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("875.0"));
}

#[test]
fn test_history_csv_export() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let csv_path = dir.join("history.csv");

    cli(dir).args(["plan", "create", "Push Day"]).assert().success();
    cli(dir).args(["session", "start", "Push Day"]).assert().success();
    cli(dir).args(["session", "complete"]).assert().success();

    cli(dir)
        .arg("history")
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 sessions"));

    let contents = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(contents.contains("Push Day"));
    assert!(contents.contains("tonnage"));
}

#[test]
fn test_exercise_rm_blocked_while_in_plan() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir).args(["exercise", "add", "Squat"]).assert().success();
    cli(dir).args(["plan", "create", "Leg Day"]).assert().success();
    cli(dir)
        .args(["plan", "add", "Leg Day", "Squat"])
        .assert()
        .success();

    cli(dir)
        .args(["exercise", "rm", "Squat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workout plans"));
}

#[test]
fn test_plan_rm_keeps_session_snapshot() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir).args(["plan", "create", "Push Day"]).assert().success();
    cli(dir).args(["session", "start", "Push Day"]).assert().success();
    cli(dir).args(["session", "complete"]).assert().success();

    cli(dir).args(["plan", "rm", "Push Day"]).assert().success();

    // History still shows the snapshotted plan name
    cli(dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_users_are_isolated() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir).args(["exercise", "add", "Bench Press"]).assert().success();

    Command::new(assert_cmd::cargo::cargo_bin!("ironlog"))
        .arg("--data-dir")
        .arg(dir)
        .args(["--user", "someone-else", "exercise", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises yet"));
}
