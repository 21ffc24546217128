//! Chat message sender.

use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    /// The signed-in person typing into the chat.
    Human,
    /// The canned-reply assistant.
    Responder,
}

impl ChatSender {
    /// Returns `true` for messages typed by the person.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }
}
