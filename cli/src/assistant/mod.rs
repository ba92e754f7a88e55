//! # Folio Chat Assistant
//!
//! File: cli/src/assistant/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The rule-based chat assistant behind the portfolio site's chat widget.
//! It answers questions about the site owner and walks visitors through booking
//! an appointment.
//!
//! ## Architecture
//!
//! Leaves first:
//! - `knowledge`: The immutable `KnowledgeBase` (built-in profile or TOML file)
//! - `responder`: `KnowledgeResponder`, ordered keyword rules over the knowledge base
//! - `scheduling`: `SchedulingSession`, the linear date/time/name/email/phone dialogue
//! - `controller`: `ConversationController`, transcript ownership and message routing
//!
//! The hosts (`commands::chat`, `commands::srv`) only ever talk to a controller
//! (or, for one-shot questions, to the responder directly).
//!
//! ## Usage
//!
//! ```rust
//! use crate::assistant::{self, ConversationController};
//!
//! let responder = assistant::build_responder(&cfg, None)?;
//! let mut chat = ConversationController::new(responder, cfg.chat.reply_delay());
//! ```
//!
pub mod controller;
pub mod knowledge;
pub mod responder;
pub mod scheduling;

pub use controller::{ConversationController, Message, ReplyTicket, Role, Submission};
pub use knowledge::KnowledgeBase;
pub use responder::{BookingLink, KnowledgeResponder};

use crate::core::{config::Config, error::Result};
use std::{path::Path, sync::Arc};

/// # Build Responder (`build_responder`)
///
/// Loads the knowledge base (`override_file` first, then the configured file,
/// then the built-in profile) and pairs it with the configured booking service.
pub fn build_responder(cfg: &Config, override_file: Option<&Path>) -> Result<Arc<KnowledgeResponder>> {
    let configured = cfg.knowledge.file.as_deref().map(Path::new);
    let knowledge = KnowledgeBase::load(override_file.or(configured))?;
    let booking = BookingLink {
        url: cfg.booking.url.clone(),
        service: cfg.booking.service.clone(),
    };
    Ok(Arc::new(KnowledgeResponder::new(Arc::new(knowledge), booking)))
}
