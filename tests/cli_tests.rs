//! Integration tests for the `stackforge` binary
//!
//! Covers the two subcommands end to end: manifest synthesis to stdout and
//! file, context overrides and context files, and strict validation exit
//! codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn stackforge() -> Command {
    Command::cargo_bin("stackforge").unwrap()
}

#[test]
fn test_synth_writes_manifest_to_stdout() {
    let output = stackforge().arg("synth").output().unwrap();
    assert!(output.status.success());

    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(manifest["Resources"]["SalesEventsBucket"].is_object());
    assert!(manifest["Outputs"]["Ec2ConsumerAccessPointArn"].is_object());
    assert_eq!(manifest["Metadata"]["Project"], "stackforge");
}

#[test]
fn test_synth_is_idempotent_through_the_binary() {
    let first = stackforge().arg("synth").output().unwrap();
    let second = stackforge().arg("synth").output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_synth_writes_manifest_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");

    stackforge()
        .args(["synth", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let raw = std::fs::read_to_string(&path).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(manifest["Resources"].is_object());
}

#[test]
fn test_context_overrides_reach_the_manifest() {
    let output = stackforge()
        .args([
            "-C",
            "project=retail",
            "-C",
            "env.account=111122223333",
            "-C",
            "tags.team=data",
            "synth",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        manifest["Resources"]["SalesEventsBucket"]["Properties"]["BucketName"],
        "retail-sales-events-bkt"
    );
    assert_eq!(
        manifest["Outputs"]["Ec2ConsumerRoleArn"]["Value"],
        "arn:aws:iam::111122223333:role/retail-ec2-consumer-role"
    );
    assert_eq!(
        manifest["Resources"]["SalesEventsBucket"]["Properties"]["Tags"][0]["Key"],
        "team"
    );
}

#[test]
fn test_context_file_is_loaded() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "project: warehouse\nenv:\n  region: eu-central-1").unwrap();

    let output = stackforge()
        .arg("-c")
        .arg(file.path())
        .arg("synth")
        .output()
        .unwrap();
    assert!(output.status.success());

    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(manifest["Metadata"]["Project"], "warehouse");
    assert_eq!(
        manifest["Outputs"]["Ec2ConsumerAccessPointArn"]["Value"],
        "arn:aws:s3:eu-central-1:123456789012:accesspoint/ec2-consumer"
    );
}

#[test]
fn test_unknown_context_key_fails() {
    stackforge()
        .args(["-C", "bogus.key=1", "synth"])
        .assert()
        .failure();
}

#[test]
fn test_missing_context_file_fails() {
    stackforge()
        .args(["-c", "/nonexistent/context.yml", "synth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load context"));
}

#[test]
fn test_validate_accepts_default_composition() {
    stackforge()
        .arg("validate")
        .assert()
        .success()
        .stderr(predicate::str::contains("valid"));
}

#[test]
fn test_synth_without_tags_emits_none() {
    let output = stackforge().arg("synth").output().unwrap();
    let rendered = String::from_utf8(output.stdout).unwrap();
    assert!(!rendered.contains("\"Tags\""));
}
