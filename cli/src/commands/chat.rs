//! # Folio Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `folio chat`, a terminal front end for the conversation
//! controller. It plays the role of the site's chat widget: it reads one line
//! per message from stdin, submits it, and prints every new assistant message.
//!
//! - `bye`, `quit` or `exit` end the session (as does end of input).
//! - `/schedule` is the explicit "schedule a meeting" button.
//!
//! While a booking is being collected every line is an answer to the current
//! question, passed on exactly as typed, so a visitor named "Bye" can still
//! book.
//! - When a booking completes the booking link is printed, and with `--open` the
//!   system browser is asked to open it.
//!
//! ```bash
//! folio chat
//! folio chat --open --reply-delay-ms 0
//! printf 'schedule\n01/15/2025\n' | folio chat
//! ```
//!
use super::KnowledgeArgs;
use crate::assistant::{self, ConversationController, Role, Submission};
use crate::common::process;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Typed in place of a message to trigger scheduling without a keyword.
const SCHEDULE_COMMAND: &str = "/schedule";
const EXIT_WORDS: &[&str] = &["bye", "quit", "exit"];

/// What the REPL does with one line of input.
#[derive(Debug, PartialEq, Eq)]
enum LineAction {
    Exit,
    Schedule,
    Message,
}

/// Exit words and `/schedule` are commands only outside a booking dialogue.
fn classify_line(line: &str, scheduling_active: bool) -> LineAction {
    if scheduling_active {
        return LineAction::Message;
    }
    let command = line.trim();
    if EXIT_WORDS.iter().any(|w| command.eq_ignore_ascii_case(w)) {
        LineAction::Exit
    } else if command == SCHEDULE_COMMAND {
        LineAction::Schedule
    } else {
        LineAction::Message
    }
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Open the booking link in the system browser when scheduling completes.
    #[arg(long)]
    pub open: bool,

    /// Override the delay (milliseconds) before knowledge answers are shown.
    #[arg(long)]
    pub reply_delay_ms: Option<u64>,

    #[command(flatten)]
    pub source: KnowledgeArgs,
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let responder = assistant::build_responder(&cfg, args.source.knowledge.as_deref())?;
    let delay = args
        .reply_delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| cfg.chat.reply_delay());
    info!("Starting terminal chat (reply delay {:?})", delay);

    let mut chat = ConversationController::new(responder, delay);
    let mut shown = print_new_messages(&chat, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            debug!("End of input, closing chat");
            println!();
            break;
        };

        let submission = match classify_line(&line, chat.scheduling_step().is_some()) {
            LineAction::Exit => {
                println!("Assistant: Goodbye!");
                break;
            }
            LineAction::Schedule => {
                chat.start_scheduling();
                None
            }
            LineAction::Message => Some(chat.submit(&line)),
        };

        if chat.pending_replies() > 0 {
            chat.settle().await;
        }
        shown = print_new_messages(&chat, shown);

        if let Some(Submission::Booked { booking, url }) = submission {
            info!("Booking collected for {} on {} at {}", booking.name, booking.date, booking.time);
            println!("Booking link: {}", url);
            if args.open {
                if let Err(e) = process::open_in_browser(&url) {
                    warn!("Could not open the booking link: {:#}", e);
                }
            }
        }
    }

    Ok(())
}

/// Prints assistant messages after index `from`; returns the new transcript length.
fn print_new_messages(chat: &ConversationController, from: usize) -> usize {
    let transcript = chat.transcript();
    for message in transcript.iter().skip(from) {
        if message.role == Role::Assistant {
            println!("Assistant: {}", message.content);
        }
    }
    transcript.len()
}
