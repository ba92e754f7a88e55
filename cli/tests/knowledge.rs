//! # Folio CLI Knowledge Integration Tests
//!
//! File: cli/tests/knowledge.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `folio knowledge`, and for feeding an exported (and
//! edited) knowledge file back to the assistant with `--knowledge`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_knowledge_summary() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .arg("knowledge")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Knowledge source: built-in profile"))
        .stdout(predicate::str::contains("Name:        Waddhanabot Yi"));
}

#[test]
fn test_exported_knowledge_round_trips_through_ask() {
    let temp_dir = tempdir().unwrap();
    let output = isolated_cmd(temp_dir.path())
        .args(["knowledge", "--export"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let exported = String::from_utf8(output.stdout).unwrap();
    assert!(exported.contains("name = \"Waddhanabot Yi\""));
    let kb_path = temp_dir.path().join("jane.toml");
    fs::write(&kb_path, exported.replace("Waddhanabot Yi", "Jane Doe")).unwrap();

    isolated_cmd(temp_dir.path())
        .args(["ask", "--knowledge"])
        .arg(&kb_path)
        .arg("who are you?")
        .assert()
        .success()
        .stdout("My name is Jane Doe.\n");

    isolated_cmd(temp_dir.path())
        .arg("knowledge")
        .env("FOLIO_KNOWLEDGE", &kb_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:        Jane Doe"));
}

#[test]
fn test_invalid_knowledge_file_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let kb_path = temp_dir.path().join("broken.toml");
    fs::write(&kb_path, "name = \"Jane\"\nunknown_field = true\n").unwrap();

    isolated_cmd(temp_dir.path())
        .arg("knowledge")
        .arg("-k")
        .arg(&kb_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid knowledge file"));
}
