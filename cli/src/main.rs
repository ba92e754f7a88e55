//! # Folio Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for the Folio CLI: the portfolio chat assistant on the terminal,
//! and the server that hosts the portfolio site with the same assistant behind
//! a JSON API.
//!
//! - Command-line argument parsing using Clap
//! - Logging setup based on the `-v` flag (or `RUST_LOG`)
//! - Routing to the command handlers and reporting their errors
//!
//! ## Examples
//!
//! ```bash
//! folio ask "What are you passionate about?"
//! folio chat --open
//! folio -v srv ./dist
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod assistant; // Knowledge responder, scheduling dialogue, conversation controller
mod commands; // Command handlers (ask, chat, knowledge, srv)
mod common; // Host OS helpers
mod core; // Errors and configuration

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    about = "💬 Folio: portfolio chat assistant and site host",
    long_about = "Ask the portfolio assistant about skills, experience and projects, book a meeting\n\
                  through it, or host the portfolio site together with its chat API.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Ask the assistant a single question.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Chat with the assistant interactively, including booking a meeting.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Show or export the knowledge base the assistant answers from.
    #[command(alias = "k")]
    Knowledge(commands::knowledge::KnowledgeCmdArgs),
    /// Serve the portfolio site and the chat API.
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Knowledge(args) => commands::knowledge::handle_knowledge(args).await,
        Commands::Srv(args) => commands::srv::handle_srv(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
