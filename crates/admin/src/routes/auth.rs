//! Sign-in and sign-out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use stockroom_core::Email;

use crate::filters;
use crate::middleware::{ClientContext, auth::dark_theme};
use crate::models::session_keys;
use crate::services::{AuthError, navigation::HOME_PATH};
use crate::state::AppState;

/// Minimum password length accepted by the login form.
const MIN_PASSWORD_LEN: usize = 6;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/login", get(login_page).post(login))
        .route("/logout", axum::routing::post(logout))
}

/// A demo account listed on the login page.
#[derive(Debug, Clone)]
pub struct DemoAccountView {
    pub email: String,
    pub role: &'static str,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
    pub email: String,
    pub accounts: Vec<DemoAccountView>,
    pub dark_theme: bool,
}

/// Query parameters for login page messages.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub notice: Option<String>,
}

/// Login form submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginTemplate {
    fn new(accounts: Vec<DemoAccountView>, dark_theme: bool) -> Self {
        Self {
            error: None,
            notice: None,
            email: String::new(),
            accounts,
            dark_theme,
        }
    }
}

/// Accounts that can currently sign in with the demo password.
async fn demo_accounts(state: &AppState) -> Vec<DemoAccountView> {
    state
        .credentials()
        .accounts()
        .await
        .iter()
        .map(|a| DemoAccountView {
            email: a.email.to_string(),
            role: a.role.label(),
        })
        .collect()
}

/// `/` only runs when the gate let it through; send callers home.
async fn root() -> Redirect {
    Redirect::to(HOME_PATH)
}

/// Render the login page.
///
/// GET /login
async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let mut page = LoginTemplate::new(demo_accounts(&state).await, dark_theme(&session).await);
    page.notice = query.notice.as_deref().and_then(|code| match code {
        "signed_out" => Some("You have been signed out.".to_string()),
        _ => None,
    });
    page
}

/// Check the form before touching the session.
fn check_form(form: &LoginForm) -> Result<(), &'static str> {
    if Email::parse(&form.email).is_err() {
        return Err("Please enter a valid email address");
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Authenticate and return to the remembered path.
///
/// POST /login
#[instrument(skip(state, session, client, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    client: ClientContext,
    Form(form): Form<LoginForm>,
) -> Response {
    let dark = dark_theme(&session).await;
    let accounts = demo_accounts(&state).await;
    let rejected = |status: StatusCode, message: &str| {
        let mut page = LoginTemplate::new(accounts.clone(), dark);
        page.error = Some(message.to_string());
        page.email = form.email.trim().to_string();
        (status, page).into_response()
    };

    if let Err(message) = check_form(&form) {
        return rejected(StatusCode::UNPROCESSABLE_ENTITY, message);
    }

    let result = client
        .state
        .session
        .authenticate(
            state.credentials(),
            state.clock(),
            &form.email,
            &form.password,
        )
        .await;

    match result {
        Ok(identity) => {
            if let Some(at) = identity.last_login {
                let recorded = state.store().users.write().await.record_login(identity.id, at);
                if let Err(e) = recorded {
                    tracing::debug!(user_id = %identity.id, "Sign-in not recorded: {e}");
                }
            }
            if let Err(e) = session.cycle_id().await {
                tracing::error!("Failed to cycle session id: {e}");
            }
            client.state.conversation.close();
            Redirect::to(&client.state.session.take_return_path()).into_response()
        }
        Err(e @ AuthError::AttemptInFlight) => rejected(StatusCode::TOO_MANY_REQUESTS, &capitalize(&e)),
        Err(e) => rejected(StatusCode::UNAUTHORIZED, &capitalize(&e)),
    }
}

fn capitalize(error: &AuthError) -> String {
    let text = error.to_string();
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Sign out, forget the client and start a new cookie session.
///
/// POST /logout
#[instrument(skip_all)]
async fn logout(
    State(state): State<AppState>,
    session: Session,
    client: ClientContext,
) -> Redirect {
    client.state.sign_out();
    state.clients().forget(client.id).await;
    if let Err(e) = session.remove::<uuid::Uuid>(session_keys::CLIENT_ID).await {
        tracing::error!("Failed to clear client id: {e}");
    }
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
    }
    crate::error::clear_sentry_user();
    Redirect::to("/login?notice=signed_out")
}
