//! Credential lookup.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use stockroom_core::Email;

use crate::models::Identity;
use crate::store::UserStore;

/// Resolves an email/password pair to an identity.
pub trait CredentialStore: Send + Sync {
    /// Returns the matching identity, or `None` when the pair is unknown.
    fn lookup(&self, email: &Email, password: &str)
    -> impl Future<Output = Option<Identity>> + Send;
}

/// Demo accounts sharing one password.
///
/// Accounts are read from a [`UserStore`] at lookup time, so users created,
/// edited or deleted on the Users page sign in with their current role.
#[derive(Clone)]
pub struct DemoCredentials {
    users: Arc<RwLock<UserStore>>,
    password: SecretString,
}

impl std::fmt::Debug for DemoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoCredentials")
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl DemoCredentials {
    /// A private table holding `accounts`.
    #[must_use]
    pub fn new(accounts: Vec<Identity>, password: SecretString) -> Self {
        Self::shared(Arc::new(RwLock::new(UserStore::new(accounts))), password)
    }

    /// Credentials over a user table shared with the rest of the console.
    #[must_use]
    pub const fn shared(users: Arc<RwLock<UserStore>>, password: SecretString) -> Self {
        Self { users, password }
    }

    /// Accounts that can sign in, in display order.
    pub async fn accounts(&self) -> Vec<Identity> {
        self.users.read().await.list().to_vec()
    }

    fn password_matches(&self, candidate: &str) -> bool {
        let expected = self.password.expose_secret().as_bytes();
        let candidate = candidate.as_bytes();
        // Length leaks, content does not.
        expected.len() == candidate.len()
            && expected
                .iter()
                .zip(candidate)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl CredentialStore for DemoCredentials {
    async fn lookup(&self, email: &Email, password: &str) -> Option<Identity> {
        if !self.password_matches(password) {
            return None;
        }
        self.users.read().await.find_by_email(email).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn store() -> DemoCredentials {
        DemoCredentials::new(
            seed::users(chrono::Utc::now()),
            SecretString::from("password123"),
        )
    }

    #[tokio::test]
    async fn test_lookup_known_account() {
        let email = Email::parse("cashier@inventory.com").unwrap();
        let identity = store().lookup(&email, "password123").await.unwrap();
        assert_eq!(identity.role, stockroom_core::Role::Cashier);
    }

    #[tokio::test]
    async fn test_lookup_rejects_wrong_password() {
        let email = Email::parse("admin@inventory.com").unwrap();
        assert!(store().lookup(&email, "password124").await.is_none());
        assert!(store().lookup(&email, "").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_rejects_unknown_email() {
        let email = Email::parse("nobody@inventory.com").unwrap();
        assert!(store().lookup(&email, "password123").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_follows_shared_user_table() {
        let users = Arc::new(RwLock::new(UserStore::new(seed::users(chrono::Utc::now()))));
        let credentials =
            DemoCredentials::shared(Arc::clone(&users), SecretString::from("password123"));
        let email = Email::parse("assistant@inventory.com").unwrap();

        let draft = crate::models::UserDraft {
            name: "Assistant User".to_string(),
            email: email.clone(),
            role: stockroom_core::Role::Cashier,
        };
        users.write().await.update(stockroom_core::UserId::new(2), draft).unwrap();
        let identity = credentials.lookup(&email, "password123").await.unwrap();
        assert_eq!(identity.role, stockroom_core::Role::Cashier);

        users
            .write()
            .await
            .delete(stockroom_core::UserId::new(2), stockroom_core::UserId::new(1))
            .unwrap();
        assert!(credentials.lookup(&email, "password123").await.is_none());
        assert_eq!(credentials.accounts().await.len(), 2);
    }

    #[test]
    fn test_debug_redacts_password() {
        let output = format!("{:?}", store());
        assert!(!output.contains("password123"));
    }
}
