//! End-to-end CLI tests for the `booth` binary.
//!
//! `compose` and the informational commands are exercised for real; live
//! capture needs a camera and is covered by the mock-driven integration
//! tests instead.

#[path = "common/mod.rs"]
mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::fixtures::TestImages;

fn booth() -> Command {
    Command::cargo_bin("booth").expect("binary builds")
}

#[test]
fn test_help_lists_commands() {
    booth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("capture"))
        .stdout(predicate::str::contains("compose"))
        .stdout(predicate::str::contains("cameras"));
}

#[test]
fn test_no_command_prints_quick_start() {
    booth()
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick start"));
}

#[test]
fn test_compose_writes_strip() {
    let images = TestImages::create_batch(2, 64);
    let out = images.dir.path().join("strip.png");

    booth()
        .arg("compose")
        .arg(images.path(1))
        .arg(images.path(2))
        .args(["--background", "#FFC0CB"])
        .args(["--filter", "sepia"])
        .arg("--date")
        .args(["--date-text", "1/1/2026"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let strip = image::open(&out).expect("exported strip decodes").to_rgba8();
    // Fixed strip width; pink background in the frame corner.
    assert_eq!(strip.width(), 320);
    assert_eq!(strip.get_pixel(1, 1).0, [0xFF, 0xC0, 0xCB, 0xFF]);
}

#[test]
fn test_compose_with_sticker_spec() {
    let images = TestImages::create_batch(3, 64);
    let out = images.dir.path().join("strip.png");

    booth()
        .arg("compose")
        .arg(images.path(1))
        .args(["--sticker"])
        .arg(format!("{}@20,30,1.5", images.path(2).display()))
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn test_compose_skips_non_image_inputs() {
    let images = TestImages::create_batch(1, 64);
    let text = images.write_text_file("notes.txt");
    let out = images.dir.path().join("strip.png");

    booth()
        .arg("compose")
        .arg(images.path(1))
        .arg(&text)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn test_compose_rejects_all_invalid_batch() {
    let images = TestImages::create_batch(1, 64);
    let text = images.write_text_file("only.txt");

    booth()
        .arg("compose")
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("image"));
}

#[test]
fn test_compose_rejects_bad_color() {
    let images = TestImages::create_batch(1, 64);

    booth()
        .arg("compose")
        .arg(images.path(1))
        .args(["--background", "#NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RRGGBB"));
}

#[test]
fn test_robot_error_output_is_json() {
    let images = TestImages::create_batch(1, 64);

    let assert = booth()
        .arg("--robot")
        .arg("compose")
        .arg(images.path(1))
        .args(["--background", "bogus"])
        .assert()
        .failure();

    // Stderr may carry single-line JSON log records; the error object is
    // the pretty-printed block at the end.
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    let start = stderr.rfind("{\n").expect("pretty JSON error object");
    let value: serde_json::Value =
        serde_json::from_str(stderr[start..].trim()).expect("robot errors are JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["recoverable"], true);
}

#[test]
fn test_completions_generate() {
    booth()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("booth"));
}
