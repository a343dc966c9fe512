//! Integration tests for the fitlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session logging workflow and validation
//! - User profile save/show
//! - Summary output
//! - PDF report export

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
    Command::new(assert_cmd::cargo::cargo_bin!("fitlog"))
}

fn set_valid_user(data_dir: &std::path::Path) {
    cli()
        .args(["user", "set"])
        .args(["--name", "Bob"])
        .args(["--regn-id", "X1"])
        .args(["--age", "35"])
        .args(["--gender", "M"])
        .args(["--height", "180"])
        .args(["--weight", "80"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Single-user fitness logging service"));
}

#[test]
fn test_log_session_creates_document() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .args(["--category", "Warm-up"])
        .args(["Jumping Jacks", "5"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Added Jumping Jacks (5 min) to Warm-up!",
        ));

    let content = fs::read_to_string(data_dir.join("workouts.json")).expect("Failed to read doc");
    assert!(content.contains("Jumping Jacks"));
}

#[test]
fn test_log_rejects_invalid_duration_without_side_effect() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    for duration in ["0", "-5", "abc"] {
        cli()
            .arg("log")
            .args(["Push-ups", duration])
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Duration must be a positive whole number.",
            ));
    }

    assert!(!data_dir.join("workouts.json").exists());
}

#[test]
fn test_log_rejects_blank_exercise() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .args(["   ", "10"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please provide both exercise and duration.",
        ));
}

#[test]
fn test_log_uses_profile_weight_for_calories() {
    let temp_dir = setup_test_dir();
    set_valid_user(temp_dir.path());

    // 6.0 * 3.5 * 80 / 200 * 10 = 84.0
    cli()
        .arg("log")
        .args(["Push-ups", "10"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("84.0 kcal"));
}

#[test]
fn test_summary_lists_all_categories_and_total() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .args(["--category", "Warm-up"])
        .args(["Jog", "5"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();
    cli()
        .arg("log")
        .args(["Push-ups", "10"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("summary")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Warm-up"))
        .stdout(predicate::str::contains("Cool-down"))
        .stdout(predicate::str::contains("Total Time Spent: 15 minutes"));
}

#[test]
fn test_free_form_category_creates_bucket() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .args(["--category", "Yoga"])
        .args(["Sun Salutation", "20"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let content = fs::read_to_string(data_dir.join("workouts.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(doc.get("Yoga").is_some());
    // Default categories are persisted even when empty.
    assert!(doc.get("Warm-up").is_some());
}

#[test]
fn test_user_set_and_show() {
    let temp_dir = setup_test_dir();
    set_valid_user(temp_dir.path());

    cli()
        .args(["user", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI:"))
        .stdout(predicate::str::contains("Bob"));
}

#[test]
fn test_user_set_invalid_collects_all_errors() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["user", "set"])
        .args(["--name", "Test"])
        .args(["--regn-id", "R1"])
        .args(["--age", "30"])
        .args(["--gender", "X"])
        .args(["--height", "10"])
        .args(["--weight", "10"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gender must be M or F."))
        .stderr(predicate::str::contains("Height out of range"));

    assert!(!temp_dir.path().join("user.json").exists());
}

#[test]
fn test_user_show_without_profile() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["user", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No user profile saved yet."));
}

#[test]
fn test_export_writes_pdf() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let output = data_dir.join("report.pdf");

    cli()
        .arg("log")
        .args(["--category", "Warm-up"])
        .args(["Jumping Jacks", "5"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("export")
        .arg("--output")
        .arg(&output)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let bytes = fs::read(&output).expect("Failed to read PDF");
    assert_eq!(&bytes[..4], b"%PDF");
}
