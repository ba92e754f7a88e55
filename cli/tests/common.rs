//! # Folio CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test binary
//! runs the compiled `folio` executable.
//!
//! Folio reads `.folio.toml` from the working directory upwards and a user
//! `config.toml`, so tests that depend on default behavior run the binary from
//! an empty temporary directory with its own config home (`isolated_cmd`).
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get Folio Command (`folio_cmd`)
///
/// An `assert_cmd::Command` for the `folio` binary built for this test run.
///
/// ## Panics
/// Panics if the `folio` binary cannot be found via `Command::cargo_bin`.
pub fn folio_cmd() -> Command {
    Command::cargo_bin("folio").expect("Failed to find folio binary for testing")
}

/// # Get Isolated Folio Command (`isolated_cmd`)
///
/// Like `folio_cmd`, but runs in `dir` with `HOME` and `XDG_CONFIG_HOME`
/// pointing there and `FOLIO_KNOWLEDGE` unset, so no config or knowledge file
/// from the developer's machine leaks into the test.
pub fn isolated_cmd(dir: &Path) -> Command {
    let mut cmd = folio_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("FOLIO_KNOWLEDGE")
        .env_remove("RUST_LOG");
    cmd
}
