//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

mod common;

use common::{help_sequence, help_signal, record, write_log};
use predicates::prelude::*;

// === Missing/Invalid Argument Tests ===

#[test]
fn test_missing_subcommand_shows_usage() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_watch_requires_landmarks() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .args(["watch", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--landmarks"));
}

#[test]
fn test_nonexistent_landmark_log() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--landmarks", "/nonexistent/hands.jsonl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to open landmark log"));
}

#[test]
fn test_nonexistent_frames_directory() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--frames", "missing", "--landmarks"])
        .arg(&log)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read frame directory"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--format", "xml", "--landmarks"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    for format in ["json", "jsonl"] {
        help_signal(dir.path())
            .args(["watch", "--dry-run", "-q", "--format", format, "--landmarks"])
            .arg(&log)
            .assert()
            .success();
    }
}

// === Frame Rate Validation Tests ===

#[test]
fn test_zero_frame_rate_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--frame-rate", "0", "--landmarks"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a positive frame rate"));
}

#[test]
fn test_non_numeric_frame_rate_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--frame-rate", "fast", "--landmarks"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_tiny_frame_rate_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(
        dir.path(),
        "hands.jsonl",
        &[record(0, None, &[]), record(1, None, &[])],
    );
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--frame-rate", "1e-300", "--landmarks"])
        .arg(&log)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Frame 1 has no valid timestamp"));
}

#[test]
fn test_landmarks_and_detector_cmd_conflict() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--landmarks", "-", "--detector-cmd", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// === Verbosity Level Tests ===

#[test]
fn test_verbosity_levels() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());

    help_signal(dir.path())
        .args(["watch", "--dry-run", "-q", "--landmarks"])
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded").not());

    help_signal(dir.path())
        .args(["-v", "watch", "--dry-run", "-q", "--landmarks"])
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded 4 frames of landmarks"));

    help_signal(dir.path())
        .args(["watch", "-vvv", "--dry-run", "-q", "--landmarks"])
        .arg(&log)
        .assert()
        .success();
}

#[test]
fn test_quiet_suppresses_progress() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--progress", "-q", "--landmarks"])
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("ALERT").not());
}

#[test]
fn test_alert_line_without_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "hands.jsonl", &help_sequence());
    help_signal(dir.path())
        .args(["watch", "--dry-run", "--landmarks"])
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("ALERT: help signal from hand#0 at frame 3"));
}

// === Help and Version ===

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch").and(predicate::str::contains("classify")));
}

#[test]
fn test_watch_help_lists_options() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--dry-run")
                .and(predicate::str::contains("--inline-alerts"))
                .and(predicate::str::contains("--no-mirror")),
        );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    help_signal(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("help-signal"));
}
