//! # Folio HTTP Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the Axum server behind `folio srv`. One router carries both halves of
//! the portfolio site:
//! - the chat API under `/api` (see `api.rs`),
//! - the built site itself, served from disk, with unknown paths answered by the
//!   index file so client-side routes survive a page reload.
//!
//! ## Architecture
//!
//! 1. Pick a free port, starting at the configured one
//! 2. Inspect the site directory and print the banner
//! 3. Build the router with tracing and CORS layers
//! 4. Serve until Ctrl+C or SIGTERM
//!
//! ```rust
//! let config = config::load_and_merge_config(args).await?;
//! server_logic::run_server(config, hub).await?;
//! ```
//!
use super::api::{self, SharedHub};
use super::config::ServerConfig;
use super::utils;
use crate::common::process;
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port from `config.port` onwards and serves the site and
/// chat API until a shutdown signal arrives.
///
/// ## Errors
///
/// - No free port within ten attempts.
/// - The listener cannot be bound, or the server fails while running.
pub async fn run_server(config: ServerConfig, hub: SharedHub) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;

    let site = utils::inspect_site(&config.directory, &config.index_file);
    let local_ip = process::get_local_ip();
    let app = create_app(&config, hub);

    println!("\n=================================================================");
    println!("📂 Serving site from:  {}", config.directory.display());
    println!("🌐 Local URL:          http://localhost:{}", addr.port());
    if local_ip != "localhost" {
        println!("🔗 Network URL:        http://{}:{}", local_ip, addr.port());
    }
    println!("💬 Chat API:           http://localhost:{}/api/chat", addr.port());
    println!("⚙️  Binding to address: {}", addr);
    println!(
        "❓ Index file:         {}{}",
        config.index_file,
        if site.has_index { "" } else { " (missing)" }
    );
    println!("🔒 CORS enabled:       {}", config.enable_cors);
    println!("=================================================================\n");

    info!(
        "Starting server on {} for directory {} ({} files, {} directories)",
        addr,
        config.directory.display(),
        site.files,
        site.directories
    );
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts` ports in
/// total. The probe listener is dropped before returning.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// API routes take precedence. Everything else goes to the site directory, and
/// paths with no file behind them get the index file.
fn create_app(config: &ServerConfig, hub: SharedHub) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let index = ServeFile::new(config.directory.join(&config.index_file));
    let site = ServeDir::new(&config.directory).fallback(index);

    Router::new()
        .merge(api::router(hub))
        .fallback_service(site)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}
