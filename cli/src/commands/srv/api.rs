//! # Folio Chat API
//!
//! File: cli/src/commands/srv/api.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The JSON endpoints the portfolio page's chat widget talks to. Each browser
//! conversation gets its own `ConversationController`, keyed by a random id the
//! server hands out on first contact.
//!
//! | Method | Path              | Purpose                                           |
//! |--------|-------------------|---------------------------------------------------|
//! | GET    | `/api/health`     | Liveness probe, returns `OK`                      |
//! | GET    | `/api/answer?q=`  | One-shot knowledge answer, no conversation        |
//! | POST   | `/api/chat`       | Submit a message or the `schedule` action         |
//! | GET    | `/api/chat/{id}`  | Full transcript of a conversation                 |
//!
//! ## Chat Exchange
//!
//! ```json
//! POST /api/chat
//! { "conversation_id": "4f0c…", "message": "Let's schedule a meeting" }
//!
//! 200 OK
//! { "conversation_id": "4f0c…", "step": "date",
//!   "messages": [ {"role": "user", …}, {"role": "assistant", …} ] }
//! ```
//!
//! `messages` holds only the entries added by this request (the greeting is
//! included when a conversation is created). When scheduling completes,
//! `booking_url` is set and the page opens it in a new tab.
//!
//! ## Concurrency
//!
//! The conversation map sits behind one mutex held only to look up, insert or
//! evict entries. Each conversation has its own mutex, held only while a request
//! submits to it or reads it. A request whose message gets a delayed knowledge
//! answer releases the conversation while it waits, so a second message to the
//! same conversation is recorded (and answered) immediately, and answers land in
//! the transcript in the order they complete.
//!
//! Idle conversations are evicted after the configured time to live. When the
//! map is full, starting a conversation evicts the least recently used one.
//!
use crate::assistant::scheduling::StepKind;
use crate::assistant::{ConversationController, KnowledgeResponder, Message, ReplyTicket, Submission};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Live conversations plus what is needed to start new ones.
pub struct ChatHub {
    responder: Arc<KnowledgeResponder>,
    reply_delay: Duration,
    ttl: Duration,
    max_conversations: usize,
    conversations: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    controller: SharedController,
    last_seen: Instant,
}

pub type SharedHub = Arc<ChatHub>;
type SharedController = Arc<Mutex<ConversationController>>;

impl ChatHub {
    pub fn new(
        responder: Arc<KnowledgeResponder>,
        reply_delay: Duration,
        ttl: Duration,
        max_conversations: usize,
    ) -> Self {
        Self {
            responder,
            reply_delay,
            ttl,
            max_conversations: max_conversations.max(1),
            conversations: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    async fn conversation_count(&self) -> usize {
        self.conversations.lock().await.len()
    }

    /// Returns the conversation for `id`, creating one (with a fresh id) when
    /// `id` is absent or unknown. The flag is `true` for a new conversation.
    async fn checkout(&self, id: Option<&str>) -> (String, SharedController, bool) {
        let mut conversations = self.conversations.lock().await;
        let now = Instant::now();
        let ttl = self.ttl;
        let before = conversations.len();
        conversations.retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);
        if conversations.len() < before {
            debug!("Evicted {} idle conversation(s)", before - conversations.len());
        }

        if let Some(id) = id {
            if let Some(entry) = conversations.get_mut(id) {
                entry.last_seen = now;
                return (id.to_string(), entry.controller.clone(), false);
            }
            debug!("Unknown conversation id {:?}, starting a new conversation", id);
        }

        while conversations.len() >= self.max_conversations {
            let oldest = conversations
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    warn!("Conversation limit ({}) reached, evicting {}", self.max_conversations, oldest);
                    conversations.remove(&oldest);
                }
                None => break,
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let controller = Arc::new(Mutex::new(ConversationController::new(
            self.responder.clone(),
            self.reply_delay,
        )));
        conversations.insert(
            id.clone(),
            Entry {
                controller: controller.clone(),
                last_seen: now,
            },
        );
        info!("Started conversation {} ({} active)", id, conversations.len());
        (id, controller, true)
    }

    async fn find(&self, id: &str) -> Option<SharedController> {
        self.conversations
            .lock()
            .await
            .get(id)
            .map(|entry| entry.controller.clone())
    }
}

/// Errors returned to API clients as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request must include a message or an action.")]
    EmptyRequest,
    #[error("Conversation '{0}' not found.")]
    ConversationNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::EmptyRequest => StatusCode::BAD_REQUEST,
            ApiError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatAction {
    /// The widget's "schedule a meeting" button.
    Schedule,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub conversation_id: Option<String>,
    pub message: Option<String>,
    pub action: Option<ChatAction>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepKind>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

pub fn router(hub: SharedHub) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/answer", get(answer))
        .route("/api/chat", post(chat))
        .route("/api/chat/{id}", get(transcript))
        .with_state(hub)
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// GET /api/answer?q=...
pub async fn answer(State(hub): State<SharedHub>, Query(query): Query<AnswerQuery>) -> Json<AnswerResponse> {
    Json(AnswerResponse {
        answer: hub.responder.find_answer(&query.q),
    })
}

/// POST /api/chat
pub async fn chat(
    State(hub): State<SharedHub>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.filter(|m| !m.trim().is_empty());
    if message.is_none() && request.action.is_none() {
        return Err(ApiError::EmptyRequest);
    }

    let (conversation_id, shared, created) =
        hub.checkout(request.conversation_id.as_deref()).await;

    let (seen, ticket, deliveries, booking_url) = {
        let mut controller = shared.lock().await;
        // Taken before collecting, so answers to earlier requests that were
        // abandoned mid-wait are still returned to the client.
        let seen = if created { 0 } else { controller.transcript().len() };
        controller.collect_delivered();

        if request.action == Some(ChatAction::Schedule) {
            controller.start_scheduling();
        }
        let (ticket, booking_url) = match message.map(|m| controller.submit(&m)) {
            Some(Submission::Deferred(ticket)) => (Some(ticket), None),
            Some(Submission::Booked { url, .. }) => (None, Some(url)),
            _ => (None, None),
        };
        (seen, ticket, controller.deliveries(), booking_url)
    };

    if let Some(ticket) = ticket {
        wait_for_reply(&shared, ticket, deliveries).await;
    }

    let mut controller = shared.lock().await;
    controller.collect_delivered();
    let step = if booking_url.is_some() {
        Some(StepKind::Complete)
    } else {
        controller.scheduling_step()
    };

    Ok(Json(ChatResponse {
        conversation_id,
        step,
        messages: controller.transcript()[seen..].to_vec(),
        booking_url,
    }))
}

/// Waits, without holding the conversation lock, until the answer for
/// `ticket` has been collected into the transcript.
async fn wait_for_reply(
    shared: &SharedController,
    ticket: ReplyTicket,
    mut deliveries: tokio::sync::watch::Receiver<u64>,
) {
    loop {
        {
            let mut controller = shared.lock().await;
            controller.collect_delivered();
            if controller.is_delivered(ticket) {
                return;
            }
        }
        if deliveries.changed().await.is_err() {
            return;
        }
    }
}

/// GET /api/chat/{id}
pub async fn transcript(
    State(hub): State<SharedHub>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let controller = hub
        .find(&id)
        .await
        .ok_or_else(|| ApiError::ConversationNotFound(id.clone()))?;
    let mut controller = controller.lock().await;
    controller.collect_delivered();
    Ok(Json(TranscriptResponse {
        conversation_id: id,
        messages: controller.transcript().to_vec(),
    }))
}
