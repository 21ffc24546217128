//! Session gate: credential lookup and the per-client session slot.

mod credentials;
mod error;
mod session;

pub use credentials::{CredentialStore, DemoCredentials};
pub use error::AuthError;
pub use session::SessionHandle;
