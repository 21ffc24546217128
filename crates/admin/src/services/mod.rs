//! Business logic services for the console.
//!
//! # Services
//!
//! - `assistant` - Keyword responder, thinking delay and conversation log
//! - `auth` - Credential lookup and the per-client session slot
//! - `clock` - Time source
//! - `dashboard` - Aggregate figures for the dashboard and analytics
//! - `navigation` - Destination registry and authorization checks

pub mod assistant;
pub mod auth;
pub mod clock;
pub mod dashboard;
pub mod navigation;

pub use assistant::{ConversationHandle, PendingReply, Responder, ThinkingDelay};
pub use auth::{AuthError, CredentialStore, DemoCredentials, SessionHandle};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::DashboardStats;
pub use navigation::{Destination, DestinationRegistry, Resolution, is_authorized};
