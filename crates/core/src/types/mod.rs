//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod email;
pub mod id;
pub mod money;
pub mod role;

pub use chat::ChatSender;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use role::{Role, RoleError};
