//! # Folio Conversation Controller
//!
//! File: cli/src/assistant/controller.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Owns one conversation: its append-only transcript and at most one active
//! [`SchedulingSession`]. Every submitted message is recorded first, then routed
//! to exactly one handler:
//!
//! 1. an active scheduling session consumes the message, whatever it says;
//! 2. otherwise a message mentioning "schedule", "appointment" or "meet" starts a
//!    session and gets the opening prompt;
//! 3. otherwise the [`KnowledgeResponder`] answers, delivered after [`REPLY_DELAY`].
//!
//! ## Delayed Replies
//!
//! Knowledge answers are produced by a spawned tokio task that sleeps for the
//! configured delay and sends the reply over an mpsc channel. Scheduling replies
//! are appended synchronously. Replies that have fired are appended at the start
//! of the next submission, on [`ConversationController::collect_delivered`] and
//! on [`ConversationController::settle`], so the transcript holds them in the
//! order they completed. Methods that submit must run inside a tokio runtime.
//!
//! Each deferred answer gets a [`ReplyTicket`]. A host that shares the controller
//! behind a lock can release it, wait on [`ConversationController::deliveries`],
//! and re-lock to check [`ConversationController::is_delivered`], so other
//! messages keep flowing while an answer is on its way.
//!
//! ## Examples
//!
//! ```rust
//! let mut chat = ConversationController::new(responder, REPLY_DELAY);
//! chat.submit("What skills do you have?");
//! chat.settle().await; // Knowledge reply is now in chat.transcript()
//! ```
//!
use super::responder::KnowledgeResponder;
use super::scheduling::{Booking, SchedulingSession, StepKind, StepOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

/// Pause before a knowledge answer is shown, so replies do not appear instantly.
pub const REPLY_DELAY: Duration = Duration::from_millis(500);

/// First assistant message of every conversation.
pub const GREETING: &str = "Hi! Ask me any questions about myself or schedule appointments through this chatbot assistant. What would you like to know? (Ask me what I am passionate about?)";

/// Words that turn a plain message into a scheduling request.
const SCHEDULING_TRIGGERS: &[&str] = &["schedule", "appointment", "meet"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Identifies one deferred knowledge answer within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

/// How a submitted message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing was recorded.
    Ignored,
    /// A knowledge answer is on its way.
    Deferred(ReplyTicket),
    /// A scheduling dialogue was opened.
    SchedulingStarted,
    /// The active dialogue took the message (advanced or re-prompted).
    SchedulingStep(StepKind),
    /// The dialogue finished; the host should open `url` in a new context.
    Booked { booking: Booking, url: String },
}

/// Drives a single conversation. Not shared: hosts hold it behind `&mut`.
#[derive(Debug)]
pub struct ConversationController {
    responder: Arc<KnowledgeResponder>,
    reply_delay: Duration,
    transcript: Vec<Message>,
    scheduling: Option<SchedulingSession>,
    delivered_tx: mpsc::UnboundedSender<(ReplyTicket, Message)>,
    delivered_rx: mpsc::UnboundedReceiver<(ReplyTicket, Message)>,
    /// Bumped after every send on `delivered_tx`.
    sent: Arc<watch::Sender<u64>>,
    outstanding: HashSet<ReplyTicket>,
    next_ticket: u64,
}

impl ConversationController {
    pub fn new(responder: Arc<KnowledgeResponder>, reply_delay: Duration) -> Self {
        let (delivered_tx, delivered_rx) = mpsc::unbounded_channel();
        let (sent, _) = watch::channel(0);
        Self {
            responder,
            reply_delay,
            transcript: vec![Message::assistant(GREETING)],
            scheduling: None,
            delivered_tx,
            delivered_rx,
            sent: Arc::new(sent),
            outstanding: HashSet::new(),
            next_ticket: 0,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The step the active scheduling dialogue waits on, if any.
    pub fn scheduling_step(&self) -> Option<StepKind> {
        self.scheduling.as_ref().map(SchedulingSession::kind)
    }

    /// Knowledge answers spawned but not yet in the transcript.
    pub fn pending_replies(&self) -> usize {
        self.outstanding.len()
    }

    /// `true` once the answer for `ticket` is in the transcript.
    pub fn is_delivered(&self, ticket: ReplyTicket) -> bool {
        !self.outstanding.contains(&ticket)
    }

    /// Changes whenever a delayed answer has been sent and is ready to collect.
    pub fn deliveries(&self) -> watch::Receiver<u64> {
        self.sent.subscribe()
    }

    /// # Submit Message (`submit`)
    ///
    /// Records `input` as a user message and routes it. Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Submission {
        self.collect_delivered();
        if input.trim().is_empty() {
            return Submission::Ignored;
        }

        self.transcript.push(Message::user(input));

        if let Some(session) = self.scheduling.take() {
            return self.continue_scheduling(session, input);
        }

        let lowered = input.to_lowercase();
        if SCHEDULING_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            debug!("Message requests scheduling");
            self.open_scheduling();
            return Submission::SchedulingStarted;
        }

        Submission::Deferred(self.defer_answer(input))
    }

    /// # Start Scheduling (`start_scheduling`)
    ///
    /// The explicit "schedule a meeting" action. Opens a dialogue exactly like a
    /// scheduling keyword would. Returns `false` and changes nothing when a
    /// dialogue is already running.
    pub fn start_scheduling(&mut self) -> bool {
        self.collect_delivered();
        if self.scheduling.is_some() {
            debug!("Scheduling already in progress, ignoring start request");
            return false;
        }
        self.open_scheduling();
        true
    }

    /// Appends every delayed reply that has already fired. Returns how many.
    pub fn collect_delivered(&mut self) -> usize {
        let mut collected = 0;
        while let Ok((ticket, message)) = self.delivered_rx.try_recv() {
            self.deliver(ticket, message);
            collected += 1;
        }
        collected
    }

    /// Waits until every outstanding delayed reply is in the transcript.
    pub async fn settle(&mut self) {
        while !self.outstanding.is_empty() {
            match self.delivered_rx.recv().await {
                Some((ticket, message)) => self.deliver(ticket, message),
                None => break,
            }
        }
    }

    fn deliver(&mut self, ticket: ReplyTicket, message: Message) {
        self.outstanding.remove(&ticket);
        self.transcript.push(message);
    }

    fn open_scheduling(&mut self) {
        let (session, opening) = SchedulingSession::start();
        info!("Scheduling dialogue started");
        self.scheduling = Some(session);
        self.transcript.push(Message::assistant(opening));
    }

    fn continue_scheduling(&mut self, session: SchedulingSession, input: &str) -> Submission {
        match session.handle(input) {
            StepOutcome::Advanced { session, prompt } => {
                let step = session.kind();
                debug!("Scheduling advanced to {}", step);
                trace!("Collected so far: {:?}", session.step());
                self.scheduling = Some(session);
                self.transcript.push(Message::assistant(prompt));
                Submission::SchedulingStep(step)
            }
            StepOutcome::Rejected { session, error } => {
                let step = session.kind();
                debug!("Scheduling input rejected at {}", step);
                self.scheduling = Some(session);
                self.transcript.push(Message::assistant(error.to_string()));
                Submission::SchedulingStep(step)
            }
            StepOutcome::Completed(booking) => {
                let booking_link = self.responder.booking();
                let url = booking.url(&booking_link.url);
                info!("Scheduling dialogue complete, handing off to {}", booking_link.service);
                self.transcript
                    .push(Message::assistant(booking.confirmation(&booking_link.service)));
                Submission::Booked { booking, url }
            }
        }
    }

    fn defer_answer(&mut self, question: &str) -> ReplyTicket {
        let answer = self.responder.find_answer(question);
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.outstanding.insert(ticket);

        let tx = self.delivered_tx.clone();
        let sent = self.sent.clone();
        let delay = self.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The conversation may be gone by now; the reply is simply dropped.
            if tx.send((ticket, Message::assistant(answer))).is_ok() {
                sent.send_modify(|count| *count += 1);
            }
        });
        ticket
    }
}
