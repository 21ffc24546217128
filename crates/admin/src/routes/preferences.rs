//! Display preferences stored in the cookie session.

use axum::{Form, Router, response::Redirect, routing::post};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::auth::dark_theme;
use crate::models::session_keys;
use crate::services::navigation::{HOME_PATH, is_local_path};
use crate::state::AppState;

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new().route("/preferences/theme", post(toggle_theme))
}

/// Theme toggle submission.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeForm {
    pub return_to: Option<String>,
}

/// Flip between the light and dark theme, then go back.
///
/// POST /preferences/theme
async fn toggle_theme(session: Session, Form(form): Form<ThemeForm>) -> Result<Redirect, AppError> {
    let dark = !dark_theme(&session).await;
    session.insert(session_keys::DARK_THEME, dark).await?;
    tracing::debug!(dark, "Theme toggled");

    let back = form
        .return_to
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| HOME_PATH.to_string());
    Ok(Redirect::to(&back))
}
