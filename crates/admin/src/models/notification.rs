//! Navbar notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{NotificationId, UserId};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
}

/// A notification shown in the navbar dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    /// Recipient; `None` means every user.
    pub user_id: Option<UserId>,
}

impl Notification {
    /// Whether `user` should see this notification.
    #[must_use]
    pub fn is_for(&self, user: UserId) -> bool {
        self.user_id.is_none_or(|id| id == user)
    }
}
