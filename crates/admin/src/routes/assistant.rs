//! Inventory assistant chat.
//!
//! The page renders the conversation server-side; `static/assistant.js`
//! posts utterances to the JSON endpoints and appends the replies.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockroom_core::ChatSender;

use crate::components::{Chrome, Page};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{ClientContext, RequireAuth};
use crate::models::ChatMessage;
use crate::services::{PendingReply, Responder};
use crate::state::AppState;

/// Suggested prompts shown under the input.
const QUICK_QUESTIONS: [&str; 4] = [
    "What's my current stock status?",
    "Show me sales performance",
    "Which items need reordering?",
    "How do I add a new product?",
];

/// Build the assistant router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assistant", get(assistant_page))
        .route("/api/assistant/messages", post(send_message))
        .route("/api/assistant/reset", post(reset_conversation))
}

/// A message as rendered on the page.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub content: String,
    pub from_human: bool,
    pub time: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            content: message.content.clone(),
            from_human: message.sender == ChatSender::Human,
            time: message.created_at.format("%H:%M").to_string(),
        }
    }
}

/// Assistant page template.
#[derive(Template, WebTemplate)]
#[template(path = "assistant/index.html")]
pub struct AssistantTemplate {
    pub chrome: Chrome,
    pub messages: Vec<MessageView>,
    pub quick_questions: &'static [&'static str],
}

/// Chat page.
///
/// GET /assistant
#[instrument(skip(page, state))]
async fn assistant_page(page: Page, State(state): State<AppState>) -> AssistantTemplate {
    let name = page.identity.name.clone();
    let conversation = page
        .client
        .state
        .conversation
        .get_or_open(|| Responder::greeting(&name), state.clock().now());

    AssistantTemplate {
        chrome: page.chrome,
        messages: conversation.messages().iter().map(MessageView::from).collect(),
        quick_questions: &QUICK_QUESTIONS,
    }
}

/// Utterance posted by the chat page.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// The stored utterance and the reply, if it was delivered.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub human: ChatMessage,
    pub reply: Option<ChatMessage>,
}

/// Append an utterance and wait out the thinking delay for the reply.
///
/// If the request is abandoned the pending reply is dropped and aborted; if
/// the conversation is reset meanwhile, the reply is discarded.
///
/// POST /api/assistant/messages
///
/// # Errors
///
/// Returns `400 Bad Request` for an empty utterance.
#[instrument(skip_all, fields(len = body.content.len()))]
async fn send_message(
    RequireAuth(identity): RequireAuth,
    client: ClientContext,
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let content = body.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("message is empty".to_string()));
    }

    let conversation = &client.state.conversation;
    let now = state.clock().now();
    conversation.get_or_open(|| Responder::greeting(&identity.name), now);
    let (view, human) = conversation
        .post_human(content.clone(), now)
        .ok_or_else(|| AppError::Internal("conversation closed while posting".to_string()))?;

    let pending = PendingReply::spawn(state.responder(), content, state.thinking_delay().sample());
    let reply = match pending.wait().await {
        Some(text) => conversation.deliver(view, text.to_string(), state.clock().now()),
        None => None,
    };
    if reply.is_none() {
        tracing::debug!(%view, "Reply discarded for stale conversation view");
    }

    Ok(Json(SendMessageResponse { human, reply }))
}

/// Messages of a freshly opened conversation view.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub messages: Vec<ChatMessage>,
}

/// Start a new conversation view. Replies still pending for the old view
/// are discarded when they arrive.
///
/// POST /api/assistant/reset
#[instrument(skip_all)]
async fn reset_conversation(
    RequireAuth(identity): RequireAuth,
    client: ClientContext,
    State(state): State<AppState>,
) -> Json<ResetResponse> {
    let conversation = client
        .state
        .conversation
        .reset(Responder::greeting(&identity.name), state.clock().now());
    Json(ResetResponse {
        messages: conversation.messages().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockroom_core::ChatMessageId;

    use super::*;

    #[test]
    fn test_message_view_marks_sender() {
        let message = ChatMessage {
            id: ChatMessageId::new(1),
            content: "stock?".to_string(),
            sender: ChatSender::Human,
            created_at: Utc::now(),
        };
        assert!(MessageView::from(&message).from_human);
    }
}
