//! In-memory tables behind the console.
//!
//! The console keeps its catalog, users and settings in process memory,
//! seeded at startup from [`seed`]. Each table is guarded by a
//! `tokio::sync::RwLock` inside [`Store`].

pub mod products;
pub mod seed;
pub mod users;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Notification, Settings, Transaction};

pub use products::ProductStore;
pub use users::UserStore;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Requested entity was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness constraint violated (e.g., duplicate SKU).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The change is not allowed.
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Every table the console reads or writes.
#[derive(Debug)]
pub struct Store {
    pub products: RwLock<ProductStore>,
    /// Shared with the sign-in credentials.
    pub users: Arc<RwLock<UserStore>>,
    pub settings: RwLock<Settings>,
    transactions: Vec<Transaction>,
    notifications: Vec<Notification>,
}

impl Store {
    /// Store filled with the demo data set, timestamped relative to `now`.
    #[must_use]
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            products: RwLock::new(ProductStore::new(seed::products(now))),
            users: Arc::new(RwLock::new(UserStore::new(seed::users(now)))),
            settings: RwLock::new(seed::settings()),
            transactions: seed::transactions(now),
            notifications: seed::notifications(now),
        }
    }

    /// Transaction history, newest first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}
