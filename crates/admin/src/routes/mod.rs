//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check (outside the gate)
//! GET  /                           - Redirect to /dashboard or /login
//!
//! # Auth
//! GET  /login                      - Login page
//! POST /login                      - Authenticate, return to remembered path
//! POST /logout                     - Sign out
//!
//! # Pages
//! GET  /dashboard                  - Overview
//! GET  /products                   - Product listing (?q=, ?edit=)
//! POST /products                   - Create product
//! POST /products/{id}              - Update product
//! POST /products/{id}/delete       - Delete product
//! GET  /sales                      - Sale transactions
//! GET  /analytics                  - Stock levels and trends
//! GET  /users                      - User listing (administrators)
//! POST /users                      - Create user
//! POST /users/{id}                 - Update user
//! POST /users/{id}/delete          - Delete user
//! GET  /settings                   - Settings panel (administrators)
//! POST /settings                   - Save settings
//! POST /preferences/theme          - Toggle dark theme
//!
//! # Assistant
//! GET  /assistant                  - Chat page
//! POST /api/assistant/messages     - Send an utterance, reply after delay
//! POST /api/assistant/reset        - Start a new conversation view
//! ```
//!
//! Every route here runs behind [`navigation_gate`], which decides from the
//! destination registry whether the caller may see the page at all.

use axum::{Router, middleware::from_fn_with_state};

use crate::middleware::navigation_gate;
use crate::state::AppState;

pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod errors;
pub mod preferences;
pub mod products;
pub mod reports;
pub mod settings;
pub mod users;

/// All gated routes.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(reports::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(preferences::router())
        .merge(assistant::router())
        .route_layer(from_fn_with_state(state, navigation_gate))
}
