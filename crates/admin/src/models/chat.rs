//! Assistant conversation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockroom_core::{ChatMessageId, ChatSender};

/// A message in the assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique (per conversation) message ID.
    pub id: ChatMessageId,
    /// Message text.
    pub content: String,
    /// Who wrote it.
    pub sender: ChatSender,
    /// When the message was appended.
    pub created_at: DateTime<Utc>,
}

/// Identifies one generation of a conversation.
///
/// Resetting a conversation starts a new view; replies scheduled for an
/// older view are discarded on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(Uuid);

impl ViewId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Append-only message log for one conversation view.
#[derive(Debug, Clone)]
pub struct Conversation {
    view: ViewId,
    messages: Vec<ChatMessage>,
    next_id: ChatMessageId,
}

impl Conversation {
    /// Open a new view whose first message is `greeting` from the responder.
    #[must_use]
    pub fn open(greeting: String, now: DateTime<Utc>) -> Self {
        let mut conversation = Self {
            view: ViewId::new(),
            messages: Vec::new(),
            next_id: ChatMessageId::new(1),
        };
        conversation.append(ChatSender::Responder, greeting, now);
        conversation
    }

    #[must_use]
    pub const fn view(&self) -> ViewId {
        self.view
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message and return a copy of it.
    pub fn append(
        &mut self,
        sender: ChatSender,
        content: String,
        now: DateTime<Utc>,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            content,
            sender,
            created_at: now,
        };
        self.next_id = self.next_id.next();
        self.messages.push(message.clone());
        message
    }

    /// Append a responder reply if it was produced for this view.
    ///
    /// Returns `None` (and leaves the log untouched) for stale views.
    pub fn deliver(
        &mut self,
        view: ViewId,
        reply: String,
        now: DateTime<Utc>,
    ) -> Option<ChatMessage> {
        (view == self.view).then(|| self.append(ChatSender::Responder, reply, now))
    }
}
