//! HTTP middleware for the console.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)
//! 4. Navigation gate (resolve the request against the destination registry)

pub mod auth;
pub mod session;

pub use auth::{ClientContext, RequireAuth, navigation_gate};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
