//! Stockroom Core - Shared types library.
//!
//! This crate provides common types used across all Stockroom components:
//! - `admin` - The inventory console (gate, assistant, HTTP surface)
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP, no
//! session storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
