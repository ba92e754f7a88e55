//! # Folio Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates all top-level commands of the Folio CLI and makes them
//! accessible to the main application entry point (`main.rs`).
//!
//! ## Command Groups
//!
//! - `ask`: One-shot question to the knowledge responder
//! - `chat`: Interactive conversation with the assistant, scheduling included
//! - `knowledge`: Inspect or export the active knowledge base
//! - `srv`: HTTP host for the portfolio site and its chat API
//!
//! Each command defines its own arguments structure and handler function.
//!
use clap::Args;
use std::path::PathBuf;

/// Command for asking a single question.
pub mod ask;
/// Command for an interactive chat session on the terminal.
pub mod chat;
/// Command for inspecting the knowledge base.
pub mod knowledge;
/// Command group for the site and chat API server. Includes configuration and server logic.
pub mod srv;

/// Knowledge source override shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct KnowledgeArgs {
    /// TOML knowledge file to use instead of the configured one or the built-in profile.
    #[arg(long, short = 'k', env = "FOLIO_KNOWLEDGE")]
    pub knowledge: Option<PathBuf>,
}
