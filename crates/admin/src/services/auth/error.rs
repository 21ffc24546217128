//! Authentication and authorization error types.

use thiserror::Error;

use crate::services::navigation::Destination;

/// Errors raised by the session gate.
///
/// All variants are expected, recoverable conditions: the HTTP layer turns
/// them into a login message, a redirect or a forbidden page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credential lookup failed. The session is unchanged.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Another attempt for the same session has not finished yet.
    #[error("a sign-in attempt is already in progress")]
    AttemptInFlight,

    /// No identity is present.
    #[error("not signed in")]
    NotAuthenticated,

    /// The identity's role does not allow the destination.
    #[error("not allowed to view {}", destination.label())]
    Unauthorized { destination: Destination },
}
