//! # Folio Ask Command
//!
//! File: cli/src/commands/ask.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `folio ask`, which prints the knowledge responder's answer to one
//! question and exits. There is no conversation here: no reply delay and no
//! scheduling dialogue, so scheduling questions get the booking-link answer.
//!
//! ```bash
//! folio ask "What are your skills?"
//! folio ask where are you from
//! ```
//!
use super::KnowledgeArgs;
use crate::assistant;
use crate::core::config;
use crate::core::error::{FolioError, Result};
use anyhow::anyhow;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    #[command(flatten)]
    pub source: KnowledgeArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let question = args.question.join(" ");
    if question.trim().is_empty() {
        return Err(anyhow!(FolioError::ArgumentParsing(
            "The question must contain some text.".to_string()
        )));
    }

    let cfg = config::load_config()?;
    let responder = assistant::build_responder(&cfg, args.source.knowledge.as_deref())?;
    info!("Answering one-shot question: {:?}", question);
    println!("{}", responder.find_answer(&question));
    Ok(())
}
