//! Forbidden and not-found pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::components::Chrome;
use crate::filters;
use crate::models::Identity;
use crate::services::Destination;
use crate::state::AppState;

/// Shown when the signed-in role may not view a destination.
#[derive(Template, WebTemplate)]
#[template(path = "forbidden.html")]
pub struct ForbiddenTemplate {
    pub chrome: Chrome,
    pub destination: &'static str,
    pub role: &'static str,
}

/// Shown for unknown paths.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub path: String,
}

/// Render the forbidden page with a 403 status.
pub async fn forbidden_page(
    state: &AppState,
    identity: &Identity,
    destination: Destination,
    dark_theme: bool,
) -> Response {
    let chrome = Chrome::build(
        state,
        identity,
        destination,
        String::from("/dashboard"),
        dark_theme,
    )
    .await;
    let page = ForbiddenTemplate {
        chrome,
        destination: destination.label(),
        role: identity.role.label(),
    };
    (StatusCode::FORBIDDEN, page).into_response()
}

/// Fallback handler for unmatched paths.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            path: uri.path().to_string(),
        },
    )
}
