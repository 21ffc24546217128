//! Domain models for the console.

pub mod chat;
pub mod identity;
pub mod notification;
pub mod product;
pub mod session;
pub mod settings;
pub mod transaction;

pub use chat::{ChatMessage, Conversation, ViewId};
pub use identity::{Identity, UserDraft, UserForm};
pub use notification::{Notification, NotificationKind};
pub use product::{FieldError, Product, ProductDraft, ProductForm};
pub use session::{SessionState, keys as session_keys};
pub use settings::{BackupFrequency, Settings, SettingsForm};
pub use transaction::{Transaction, TransactionKind};
