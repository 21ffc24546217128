//! Console roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the fixed set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Role of a console user.
///
/// The set is closed: every identity carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including users and settings.
    Admin,
    /// Products, sales and analytics.
    Assistant,
    /// Sales only.
    Cashier,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Assistant, Self::Cashier];

    /// Wire/storage form (`admin`, `assistant`, `cashier`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Assistant => "assistant",
            Self::Cashier => "cashier",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Assistant => "Assistant",
            Self::Cashier => "Cashier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Admin),
            "assistant" => Ok(Self::Assistant),
            "cashier" => Ok(Self::Cashier),
            other => Err(RoleError(other.to_string())),
        }
    }
}
