//! # Folio Site Server
//!
//! File: cli/src/commands/srv/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `folio srv` hosts the built portfolio site and the JSON chat API its chat
//! widget talks to. Each browser conversation gets its own conversation
//! controller on the server, so scheduling dialogues from different visitors
//! never mix.
//!
//! ## Architecture
//!
//! - `config.rs`: server settings from arguments and `.folio-srv.toml`
//! - `api.rs`: chat API handlers and the conversation registry
//! - `server_logic.rs`: router assembly, port selection and shutdown
//! - `utils.rs`: startup inspection of the site directory
//!
//! Chat behavior (reply delay, idle timeout, booking service, knowledge file)
//! comes from the shared configuration in `.folio.toml`.
//!
//! ## Examples
//!
//! ```bash
//! # Serve the current directory on port 8000
//! folio srv
//!
//! # Serve a build directory to the local network
//! folio srv --port 9000 --host 0.0.0.0 ./dist
//!
//! # Answer from a custom knowledge file
//! folio srv -k ./knowledge.toml ./public
//! ```
//!
use crate::assistant;
use crate::core::config as core_config;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

/// Chat API handlers and per-conversation state.
pub mod api;

/// Handles configuration loading and merging for the server.
pub mod config;

/// Contains the core Axum-based HTTP server implementation.
pub mod server_logic;

/// Startup diagnostics for the served directory.
pub mod utils;

/// # Handle Server Command (`handle_srv`)
///
/// Loads the shared configuration and the knowledge base, resolves the server
/// settings, then runs the server until shutdown.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let cfg = core_config::load_config()?;
    let responder = assistant::build_responder(&cfg, args.source.knowledge.as_deref())?;

    let hub = Arc::new(api::ChatHub::new(
        responder,
        cfg.chat.reply_delay(),
        cfg.chat.conversation_ttl(),
        cfg.chat.max_conversations,
    ));

    let config = config::load_and_merge_config(args).await?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config, hub).await?;
    Ok(())
}
