//! Per-client session state.

use super::identity::Identity;

/// The single-slot session held for one browser.
///
/// Mutated only through [`crate::services::auth::SessionHandle`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current identity; `None` means anonymous.
    pub identity: Option<Identity>,
    /// An authentication attempt is in flight.
    pub loading: bool,
    /// Path the caller asked for before being sent to the login page.
    pub return_to: Option<String>,
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Keys used in the tower-sessions record.
pub mod keys {
    /// Key for the browser's client id in the client registry.
    pub const CLIENT_ID: &str = "client_id";

    /// Key for the dark theme preference.
    pub const DARK_THEME: &str = "dark_theme";
}
