//! Practice mode integration tests.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

mod common;

use common::{json_lines, Workspace};
use predicates::prelude::*;

#[test]
fn test_practice_match_exits_zero() {
    let ws = Workspace::new();
    let weights = ws.happy_weights();
    let face = ws.face("smile.png");

    let output = ws
        .cmd()
        .args(["practice", "--target", "happiness", "--model"])
        .arg(&weights)
        .arg(&face)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let lines = json_lines(&output.stdout);
    let practice = &lines[0]["practice"];
    assert_eq!(practice["target"], "happiness");
    assert_eq!(practice["predicted"], "happiness");
    assert_eq!(practice["matched"], true);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nice!"));
}

#[test]
fn test_practice_miss_exits_one() {
    let ws = Workspace::new();
    let weights = ws.happy_weights();
    let face = ws.face("attempt.png");

    let output = ws
        .cmd()
        .args(["practice", "-t", "fear", "--model"])
        .arg(&weights)
        .arg(&face)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let lines = json_lines(&output.stdout);
    assert_eq!(lines[0]["practice"]["matched"], false);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Try again for fear"));
}

#[test]
fn test_practice_any_match_in_batch_succeeds() {
    let ws = Workspace::new();
    let weights = ws.happy_weights();
    ws.face("tries/1.png");
    ws.face("tries/2.png");

    let output = ws
        .cmd()
        .args(["practice", "--target", "happiness", "--model"])
        .arg(&weights)
        .arg(ws.path().join("tries"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_lines(&output.stdout).len(), 2);
}

#[test]
fn test_practice_instructions() {
    let ws = Workspace::new();
    let weights = ws.happy_weights();
    let face = ws.face("smile.png");

    ws.cmd()
        .args(["practice", "--target", "happiness", "--instructions", "--model"])
        .arg(&weights)
        .arg(&face)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("😀 Happiness").and(predicate::str::contains("1. ")));
}

#[test]
fn test_practice_unknown_target_rejected() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["practice", "--target", "boredom", "face.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown emotion"));
}

#[test]
fn test_practice_requires_target() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["practice", "face.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--target"));
}
