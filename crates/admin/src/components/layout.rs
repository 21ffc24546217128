//! Page chrome shared by every signed-in page: sidebar, navbar and
//! notification dropdown.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;

use crate::middleware::{ClientContext, RequireAuth, auth::dark_theme};
use crate::models::{Identity, Notification, NotificationKind};
use crate::services::Destination;
use crate::state::AppState;

/// Notifications shown in the navbar dropdown.
const DROPDOWN_NOTIFICATIONS: usize = 3;

/// A sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

/// A notification as shown in the navbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub title: String,
    pub message: String,
    pub kind_class: &'static str,
    pub unread: bool,
    pub age: String,
}

impl NotificationView {
    fn new(notification: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind_class: match notification.kind {
                NotificationKind::Info => "info",
                NotificationKind::Warning => "warning",
                NotificationKind::Error => "error",
                NotificationKind::Success => "success",
            },
            unread: !notification.read,
            age: time_ago(notification.created_at, now),
        }
    }
}

/// Everything the layout template needs besides the page body.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub company_name: String,
    pub page_title: &'static str,
    pub user_name: String,
    pub user_email: String,
    pub user_initial: String,
    pub role_label: &'static str,
    pub nav: Vec<NavLink>,
    pub dark_theme: bool,
    pub unread_count: usize,
    pub notifications: Vec<NotificationView>,
    /// Path to come back to after toggling the theme.
    pub current_path: String,
}

impl Chrome {
    /// Build the chrome for `identity` on `current`.
    pub async fn build(
        state: &AppState,
        identity: &Identity,
        current: Destination,
        current_path: String,
        dark_theme: bool,
    ) -> Self {
        let now = state.clock().now();
        let company_name = state.store().settings.read().await.company_name.clone();

        let nav = state
            .destinations()
            .sidebar(Some(identity))
            .into_iter()
            .map(|rule| NavLink {
                href: rule.path,
                label: rule.destination.label(),
                icon: rule.icon,
                active: rule.destination == current,
            })
            .collect();

        let mine: Vec<&Notification> = state
            .store()
            .notifications()
            .iter()
            .filter(|n| n.is_for(identity.id))
            .collect();

        Self {
            company_name,
            page_title: current.label(),
            user_name: identity.name.clone(),
            user_email: identity.email.to_string(),
            user_initial: identity.initial(),
            role_label: identity.role.label(),
            nav,
            dark_theme,
            unread_count: mine.iter().filter(|n| !n.read).count(),
            notifications: mine
                .iter()
                .take(DROPDOWN_NOTIFICATIONS)
                .map(|n| NotificationView::new(n, now))
                .collect(),
            current_path,
        }
    }
}

/// Coarse relative time, e.g. "2 hours ago".
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let (count, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

/// Signed-in page context: identity, client state and chrome.
///
/// Rejects like [`RequireAuth`] when nobody is signed in.
pub struct Page {
    pub identity: Identity,
    pub client: ClientContext,
    pub chrome: Chrome,
}

impl FromRequestParts<AppState> for Page {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let client = ClientContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let dark = match parts.extensions.get::<Session>() {
            Some(session) => dark_theme(session).await,
            None => false,
        };

        let destination = state
            .destinations()
            .rule_for(parts.uri.path())
            .map_or(Destination::Dashboard, |rule| rule.destination);
        let current_path = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

        let chrome = Chrome::build(state, &identity, destination, current_path, dark).await;
        Ok(Self {
            identity,
            client,
            chrome,
        })
    }
}
