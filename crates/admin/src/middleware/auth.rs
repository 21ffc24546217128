//! Navigation gate and authentication extractors.
//!
//! [`navigation_gate`] runs before every page handler. It attaches the
//! browser's [`ClientContext`] to the request and resolves the path against
//! the destination registry, so handlers only ever run for callers the
//! registry admits. The extractors then read the identity back out.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Method, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{Identity, session_keys};
use crate::routes::errors;
use crate::services::{DestinationRegistry, Resolution};
use crate::state::{AppState, ClientState};

/// The browser's client id and its session state.
///
/// Inserted into request extensions by [`navigation_gate`].
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub id: Uuid,
    pub state: ClientState,
}

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::Internal("navigation gate not installed".to_string()))
    }
}

/// Read the browser's client id, assigning one on first visit.
///
/// # Errors
///
/// Returns an error if the session record cannot be read or written.
pub async fn client_id(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(session_keys::CLIENT_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(session_keys::CLIENT_ID, id).await?;
    Ok(id)
}

/// Whether the browser asked for the dark theme.
pub async fn dark_theme(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::DARK_THEME)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

fn is_api(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Resolve `path` for the client. Only page `GET`s are remembered as the
/// return path; API calls and form posts are resolved without touching it.
fn resolve_request(
    client: &ClientState,
    registry: &DestinationRegistry,
    method: &Method,
    path: &str,
) -> Resolution {
    if *method == Method::GET && !is_api(path) {
        client.session.navigate(registry, path)
    } else {
        registry.resolve(path, client.session.current().as_ref())
    }
}

/// Resolve every request against the destination registry.
///
/// - anonymous callers are sent to `/login` (API callers get `401`), with the
///   requested page remembered on `GET`; API paths are never remembered
/// - signed-in callers without the role get the forbidden page (API callers
///   get `403`)
/// - everything else continues to the handler with a [`ClientContext`]
pub async fn navigation_gate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let client_id = match client_id(&session).await {
        Ok(id) => id,
        Err(e) => return AppError::from(e).into_response(),
    };
    let client = state.clients().client(client_id).await;

    let uri = request.uri();
    let path = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    let api = is_api(uri.path());
    let resolution = resolve_request(&client, state.destinations(), request.method(), path);

    match resolution {
        Resolution::Render(_) | Resolution::NotFound => {
            match client.session.current() {
                Some(identity) => {
                    set_sentry_user(identity.id.as_i32(), Some(identity.email.as_str()));
                }
                None => clear_sentry_user(),
            }
            request.extensions_mut().insert(ClientContext {
                id: client_id,
                state: client,
            });
            next.run(request).await
        }
        Resolution::Redirect(to) => Redirect::to(to).into_response(),
        Resolution::Login { .. } if api => StatusCode::UNAUTHORIZED.into_response(),
        Resolution::Login { .. } => Redirect::to("/login").into_response(),
        Resolution::Forbidden { destination } => {
            tracing::info!(
                path = %request.uri().path(),
                destination = destination.label(),
                "forbidden"
            );
            if api {
                return StatusCode::FORBIDDEN.into_response();
            }
            let Some(identity) = client.session.current() else {
                return Redirect::to("/login").into_response();
            };
            let dark = dark_theme(&session).await;
            errors::forbidden_page(&state, &identity, destination, dark).await
        }
    }
}

/// Extractor that requires a signed-in identity.
///
/// Redirects to the login page for HTML requests, or 401 Unauthorized for
/// API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", identity.name)
/// }
/// ```
pub struct RequireAuth(pub Identity);

/// Rejection for [`RequireAuth`].
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<ClientContext>()
            .and_then(|client| client.state.session.current());

        identity.map(Self).ok_or_else(|| {
            if is_api(parts.uri.path()) {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        })
    }
}
