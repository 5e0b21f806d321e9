//! Output format tests for overlay reports.
//!
//! Detection runs against an empty models directory, so every report
//! carries the explicit models-failed state; the shape of the output is
//! what's under test.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use face_overlay_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use serde_json::Value;

fn save_test_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    SyntheticImageBuilder::gradient_image(8, 8).save(&path).unwrap();
    path
}

#[test]
fn test_jsonl_is_one_object_per_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    let a = save_test_image(temp_dir.path(), "a.png");
    let b = save_test_image(temp_dir.path(), "b.png");
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("face-overlay").unwrap();
    cmd.arg("--models-dir").arg(empty_models.path()).arg(a).arg(b);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let lines: Vec<_> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2, "one report per image");

    for line in lines {
        let parsed: Value = serde_json::from_str(line).unwrap();
        assert!(parsed.get("path").is_some());
        assert!(parsed.get("timestamp").is_some());
        assert!(parsed.get("dimensions").is_some());
        assert!(parsed.get("overlay").is_some());
    }
}

#[test]
fn test_json_array_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    let a = save_test_image(temp_dir.path(), "a.png");
    let b = save_test_image(temp_dir.path(), "b.png");
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("face-overlay").unwrap();
    cmd.arg("--format")
        .arg("json")
        .arg("--models-dir")
        .arg(empty_models.path())
        .arg(a)
        .arg(b);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.trim_start().starts_with('['));
    let parsed: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_pretty_json_still_parses() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = save_test_image(temp_dir.path(), "a.png");
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("face-overlay").unwrap();
    cmd.arg("--format")
        .arg("json")
        .arg("--pretty")
        .arg("--models-dir")
        .arg(empty_models.path())
        .arg(image);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let parsed: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    // Pretty output spans multiple lines
    assert!(stdout.trim().lines().count() > 1);
}

#[test]
fn test_report_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = save_test_image(temp_dir.path(), "test.png");
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("face-overlay").unwrap();
    cmd.arg("--models-dir").arg(empty_models.path()).arg(image);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().find(|l| !l.trim().is_empty()).unwrap();

    let parsed: Value = serde_json::from_str(line).unwrap();
    assert!(parsed["path"].as_str().unwrap().ends_with("test.png"));
    assert_eq!(parsed["dimensions"]["width"], 8);
    assert_eq!(parsed["dimensions"]["height"], 8);
    assert_eq!(parsed["overlay"]["state"], "models_failed");
    assert!(parsed["overlay"]["message"]
        .as_str()
        .unwrap()
        .contains("models fetch"));
}

#[test]
fn test_quiet_still_writes_reports() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image = save_test_image(temp_dir.path(), "test.png");
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("face-overlay").unwrap();
    cmd.arg("--quiet")
        .arg("--models-dir")
        .arg(empty_models.path())
        .arg(image);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("overlay"));
}
