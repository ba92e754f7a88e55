//! # Folio Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers that are neither chat logic (`assistant::`) nor core
//! infrastructure (`core::`):
//!
//! - **`process`**: Launching the system browser and probing the host for a LAN address.
//!

/// Utilities for executing external processes (browser launch, IP detection).
pub mod process;
