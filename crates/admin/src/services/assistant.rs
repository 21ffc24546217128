//! Inventory assistant: keyword-matched canned replies.
//!
//! [`Responder::respond`] is a pure function of the utterance. The chat
//! endpoint delivers the reply after a random [`ThinkingDelay`] through a
//! [`PendingReply`], which is aborted if the request goes away, and appends it
//! through [`ConversationHandle::deliver`], which drops replies meant for a
//! conversation view that has since been reset.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::task::JoinHandle;

use stockroom_core::ChatSender;

use crate::models::{ChatMessage, Conversation, ViewId};

/// Test over the lowercased utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any keyword is a substring.
    AnyOf(&'static [&'static str]),
    /// Every keyword is a substring.
    AllOf(&'static [&'static str]),
}

impl Trigger {
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Self::AnyOf(keywords) => keywords.iter().any(|k| lowered.contains(k)),
            Self::AllOf(keywords) => keywords.iter().all(|k| lowered.contains(k)),
        }
    }
}

/// A trigger and the reply it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRule {
    pub trigger: Trigger,
    pub reply: &'static str,
}

pub const STOCK_REPLY: &str = "Based on your current inventory, you have 3 products in stock. The Coffee Mug is running low with only 5 units remaining (below the minimum threshold of 15). I recommend restocking soon to avoid stockouts.";

pub const SALES_REPLY: &str = "Your recent sales performance shows $449.97 in total sales. The best-selling item is Wireless Headphones with 2 units sold recently. Sales have been trending upward over the past week.";

pub const LOW_STOCK_REPLY: &str = "Currently, you have 1 product with low stock: Coffee Mug (5 units remaining, minimum: 15). I suggest reordering 25-30 units to maintain healthy stock levels.";

pub const ADD_PRODUCT_REPLY: &str = "To add a new product, go to the Products page and click 'Add Product'. Make sure to include all required information: name, SKU, category, pricing, and stock levels. Don't forget to set appropriate minimum stock thresholds!";

pub const ROLES_REPLY: &str = "Your system has 3 user roles: Admin (full access), Assistant (products & sales), and Cashier (sales only). You can manage users from the Users page if you have admin privileges.";

pub const HELP_REPLY: &str = "I can help you with:\n• Stock level monitoring and alerts\n• Sales performance analysis\n• Product management guidance\n• User role explanations\n• System navigation tips\n\nWhat specific area would you like help with?";

pub const FALLBACK_REPLY: &str = "I understand you're asking about inventory management. Could you be more specific? I can help with stock levels, sales data, product management, user roles, or general system guidance.";

/// Rules in evaluation order. The first match wins.
///
/// "low stock" sits behind "stock", so it is only reachable through
/// "reorder".
pub static STANDARD_RULES: [ResponseRule; 6] = [
    ResponseRule {
        trigger: Trigger::AnyOf(&["stock", "inventory"]),
        reply: STOCK_REPLY,
    },
    ResponseRule {
        trigger: Trigger::AnyOf(&["sales", "revenue"]),
        reply: SALES_REPLY,
    },
    ResponseRule {
        trigger: Trigger::AnyOf(&["low stock", "reorder"]),
        reply: LOW_STOCK_REPLY,
    },
    ResponseRule {
        trigger: Trigger::AllOf(&["product", "add"]),
        reply: ADD_PRODUCT_REPLY,
    },
    ResponseRule {
        trigger: Trigger::AnyOf(&["user", "access"]),
        reply: ROLES_REPLY,
    },
    ResponseRule {
        trigger: Trigger::AnyOf(&["help", "how"]),
        reply: HELP_REPLY,
    },
];

/// Ordered rule list with a fallback.
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    rules: &'static [ResponseRule],
    fallback: &'static str,
}

impl Default for Responder {
    fn default() -> Self {
        Self::standard()
    }
}

impl Responder {
    #[must_use]
    pub const fn new(rules: &'static [ResponseRule], fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// The inventory assistant's rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(&STANDARD_RULES, FALLBACK_REPLY)
    }

    /// Pick the reply for `utterance`.
    #[must_use]
    pub fn respond(&self, utterance: &str) -> &'static str {
        let lowered = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(&lowered))
            .map_or(self.fallback, |rule| rule.reply)
    }

    /// Opening message of a conversation.
    #[must_use]
    pub fn greeting(name: &str) -> String {
        format!(
            "Hello {name}! I'm your inventory assistant. I can help you with product information, stock levels, sales data, and answer questions about your inventory management system. How can I assist you today?"
        )
    }
}

/// Range of the simulated thinking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingDelay {
    pub min: Duration,
    pub max: Duration,
}

impl ThinkingDelay {
    /// No delay at all.
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Draw a duration uniformly from `min..=max`.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// A reply being "thought about" on a background task.
///
/// Dropping the handle aborts the task, so an abandoned request never
/// produces a reply.
#[derive(Debug)]
pub struct PendingReply {
    task: JoinHandle<&'static str>,
}

impl PendingReply {
    /// Start computing the reply for `utterance`, released after `delay`.
    #[must_use]
    pub fn spawn(responder: Responder, utterance: String, delay: Duration) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            responder.respond(&utterance)
        });
        Self { task }
    }

    /// Abort the pending reply.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the reply. `None` if it was cancelled.
    pub async fn wait(mut self) -> Option<&'static str> {
        (&mut self.task).await.ok()
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Shared handle to a client's conversation.
///
/// Holds at most one open [`Conversation`]. Clones refer to the same log.
#[derive(Debug, Clone, Default)]
pub struct ConversationHandle {
    inner: Arc<Mutex<Option<Conversation>>>,
}

impl ConversationHandle {
    fn lock(&self) -> MutexGuard<'_, Option<Conversation>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The open conversation, opening one with `greeting` if none exists.
    pub fn get_or_open(
        &self,
        greeting: impl FnOnce() -> String,
        now: DateTime<Utc>,
    ) -> Conversation {
        self.lock()
            .get_or_insert_with(|| Conversation::open(greeting(), now))
            .clone()
    }

    /// Replace the conversation with a fresh view.
    pub fn reset(&self, greeting: String, now: DateTime<Utc>) -> Conversation {
        let conversation = Conversation::open(greeting, now);
        *self.lock() = Some(conversation.clone());
        conversation
    }

    /// Append a human message. Returns the view it belongs to, or `None` if
    /// no conversation is open.
    pub fn post_human(&self, content: String, now: DateTime<Utc>) -> Option<(ViewId, ChatMessage)> {
        self.lock().as_mut().map(|conversation| {
            let message = conversation.append(ChatSender::Human, content, now);
            (conversation.view(), message)
        })
    }

    /// Append a responder reply produced for `view`. Stale or closed views
    /// get `None`.
    pub fn deliver(&self, view: ViewId, reply: String, now: DateTime<Utc>) -> Option<ChatMessage> {
        self.lock()
            .as_mut()
            .and_then(|conversation| conversation.deliver(view, reply, now))
    }

    /// Drop the conversation.
    pub fn close(&self) {
        self.lock().take();
    }

    /// Whether a conversation is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }
}
