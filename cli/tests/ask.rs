//! # Folio CLI Ask Integration Tests
//!
//! File: cli/tests/ask.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `folio ask`, the one-shot knowledge question.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_ask_name() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["ask", "What's", "your", "NAME?"])
        .assert()
        .success()
        .stdout("My name is Waddhanabot Yi.\n");
}

#[test]
fn test_ask_origin_wins_over_name() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["ask", "where are you from, what's your name"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("I am from Cambodia"));
}

#[test]
fn test_ask_unmatched_gets_fallback() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["ask", "xyz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("I'm not sure about that"));
}

#[test]
fn test_ask_scheduling_returns_booking_link() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["ask", "can", "we", "meet?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://calendly.com/thanon43"));
}

#[test]
fn test_ask_uses_project_config_booking() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".folio.toml"),
        "[booking]\nurl = \"https://cal.example.com/jane\"\nservice = \"ExampleCal\"\n",
    )
    .unwrap();

    isolated_cmd(temp_dir.path())
        .args(["ask", "calendly"])
        .assert()
        .success()
        .stdout("You can schedule a meeting with me through my ExampleCal link: https://cal.example.com/jane\n");
}

#[test]
fn test_ask_missing_knowledge_file_fails() {
    let temp_dir = tempdir().unwrap();
    isolated_cmd(temp_dir.path())
        .args(["ask", "-k", "missing.toml", "skills"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read knowledge file"));
}
