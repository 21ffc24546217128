//! Stock movement history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Money, ProductId, TransactionId, UserId};

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Adjustment,
}

impl TransactionKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Purchase => "Purchase",
            Self::Adjustment => "Adjustment",
        }
    }
}

/// A recorded stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_amount: Money,
    pub user_id: UserId,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}
