//! Handle to one client's session slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockroom_core::Email;

use super::credentials::CredentialStore;
use super::error::AuthError;
use crate::models::{Identity, SessionState};
use crate::services::clock::Clock;
use crate::services::navigation::{DestinationRegistry, HOME_PATH, Resolution, is_local_path};

/// Shared handle to a [`SessionState`].
///
/// `authenticate` and `clear_session` are the only operations that change the
/// identity. Clones refer to the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

/// Clears the loading flag when the attempt ends, including on cancellation.
struct Attempt<'a> {
    session: &'a SessionHandle,
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        self.session.lock().loading = false;
    }
}

impl SessionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    /// Whether an authentication attempt is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Sign in with an email and password.
    ///
    /// Signing in while already signed in is a no-op that returns the current
    /// identity. On success the identity's `last_login` is stamped from
    /// `clock`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AttemptInFlight`] if another attempt on this session has
    ///   not finished.
    /// - [`AuthError::InvalidCredentials`] if the pair is unknown. The slot is
    ///   left exactly as it was.
    pub async fn authenticate<C>(
        &self,
        store: &C,
        clock: &dyn Clock,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError>
    where
        C: CredentialStore + ?Sized,
    {
        {
            let mut state = self.lock();
            if let Some(identity) = &state.identity {
                return Ok(identity.clone());
            }
            if state.loading {
                return Err(AuthError::AttemptInFlight);
            }
            state.loading = true;
        }
        let attempt = Attempt { session: self };
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let found = store.lookup(&email, password).await;

        let result = {
            let mut state = self.lock();
            match found {
                Some(mut identity) => {
                    identity.last_login = Some(clock.now());
                    state.identity = Some(identity.clone());
                    Ok(identity)
                }
                None => Err(AuthError::InvalidCredentials),
            }
        };
        drop(attempt);

        match &result {
            Ok(identity) => tracing::info!(user_id = %identity.id, role = %identity.role, "signed in"),
            Err(_) => tracing::warn!(email = %email, "sign-in rejected"),
        }
        result
    }

    /// Empty the slot. Idempotent.
    pub fn clear_session(&self) {
        let mut state = self.lock();
        state.identity = None;
        state.return_to = None;
    }

    /// Resolve `path` for the current identity.
    ///
    /// When the caller is sent to the login page the requested path is
    /// remembered for [`take_return_path`](Self::take_return_path).
    #[must_use]
    pub fn navigate(&self, registry: &DestinationRegistry, path: &str) -> Resolution {
        let mut state = self.lock();
        let resolution = registry.resolve(path, state.identity.as_ref());
        if let Resolution::Login {
            return_to: Some(return_to),
        } = &resolution
        {
            state.return_to = Some(return_to.clone());
        }
        resolution
    }

    /// Take the remembered path, falling back to the dashboard.
    #[must_use]
    pub fn take_return_path(&self) -> String {
        self.lock()
            .return_to
            .take()
            .filter(|path| is_local_path(path))
            .unwrap_or_else(|| HOME_PATH.to_string())
    }

    /// Fail unless someone is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] for an anonymous session.
    pub fn require_identity(&self) -> Result<Identity, AuthError> {
        self.current().ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use secrecy::SecretString;
    use stockroom_core::Role;
    use tokio::sync::Notify;

    use super::*;
    use crate::services::auth::DemoCredentials;
    use crate::services::clock::FixedClock;
    use crate::services::navigation::Destination;
    use crate::store::seed;

    fn demo() -> DemoCredentials {
        DemoCredentials::new(seed::users(Utc::now()), SecretString::from("password123"))
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
    }

    #[tokio::test]
    async fn test_authenticate_sets_slot_and_stamps_login() {
        let session = SessionHandle::new();
        let identity = session
            .authenticate(&demo(), &clock(), "admin@inventory.com", "password123")
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.last_login, Some(clock().0));
        assert_eq!(session.current(), Some(identity));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_failed_authenticate_leaves_slot_unchanged() {
        let session = SessionHandle::new();
        let before = session.snapshot();
        let err = session
            .authenticate(&demo(), &clock(), "admin@inventory.com", "wrong-password")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        let after = session.snapshot();
        assert_eq!(after.identity, before.identity);
        assert_eq!(after.return_to, before.return_to);
        assert!(!after.loading);
    }

    #[tokio::test]
    async fn test_malformed_email_is_invalid_credentials() {
        let session = SessionHandle::new();
        let err = session
            .authenticate(&demo(), &clock(), "not-an-email", "password123")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_while_signed_in_is_a_no_op() {
        let session = SessionHandle::new();
        let first = session
            .authenticate(&demo(), &clock(), "cashier@inventory.com", "password123")
            .await
            .unwrap();
        let second = session
            .authenticate(&demo(), &clock(), "admin@inventory.com", "password123")
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(session.current().unwrap().role, Role::Cashier);

        let malformed = session
            .authenticate(&demo(), &clock(), "not-an-email", "x")
            .await;
        assert_eq!(malformed, Ok(first));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_malformed_email_does_not_leave_attempt_loading() {
        let session = SessionHandle::new();
        let _ = session
            .authenticate(&demo(), &clock(), "not-an-email", "password123")
            .await;
        assert!(!session.is_loading());
        let identity = session
            .authenticate(&demo(), &clock(), "admin@inventory.com", "password123")
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let session = SessionHandle::new();
        session.clear_session();
        let once = session.snapshot();
        session.clear_session();
        let twice = session.snapshot();
        assert_eq!(once.identity, twice.identity);
        assert!(twice.identity.is_none());
    }

    /// Store whose lookups block until released.
    struct GatedStore {
        inner: DemoCredentials,
        release: Arc<Notify>,
    }

    impl CredentialStore for GatedStore {
        fn lookup(
            &self,
            email: &Email,
            password: &str,
        ) -> impl Future<Output = Option<Identity>> + Send {
            let release = Arc::clone(&self.release);
            let inner = self.inner.clone();
            let email = email.clone();
            let password = password.to_string();
            async move {
                release.notified().await;
                inner.lookup(&email, &password).await
            }
        }
    }

    #[tokio::test]
    async fn test_second_attempt_while_loading_is_rejected() {
        let session = SessionHandle::new();
        let store = Arc::new(GatedStore {
            inner: demo(),
            release: Arc::new(Notify::new()),
        });

        let first = {
            let session = session.clone();
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                session
                    .authenticate(store.as_ref(), &clock(), "admin@inventory.com", "password123")
                    .await
            })
        };
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        let second = session
            .authenticate(store.as_ref(), &clock(), "admin@inventory.com", "password123")
            .await;
        assert_eq!(second.unwrap_err(), AuthError::AttemptInFlight);

        store.release.notify_one();
        let identity = first.await.unwrap().unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_cancelled_attempt_clears_loading() {
        let session = SessionHandle::new();
        let store = Arc::new(GatedStore {
            inner: demo(),
            release: Arc::new(Notify::new()),
        });
        let task = {
            let session = session.clone();
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                session
                    .authenticate(store.as_ref(), &clock(), "admin@inventory.com", "password123")
                    .await
            })
        };
        while !session.is_loading() {
            tokio::task::yield_now().await;
        }
        task.abort();
        let _ = task.await;
        assert!(!session.is_loading());
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_navigate_remembers_return_path_until_sign_in() {
        let registry = DestinationRegistry::standard();
        let session = SessionHandle::new();

        assert_eq!(
            session.navigate(&registry, "/products"),
            Resolution::Login {
                return_to: Some("/products".to_string())
            }
        );

        session
            .authenticate(&demo(), &clock(), "admin@inventory.com", "password123")
            .await
            .unwrap();
        assert_eq!(session.take_return_path(), "/products");
        assert_eq!(
            session.navigate(&registry, "/products"),
            Resolution::Render(Destination::Products)
        );
        assert_eq!(session.take_return_path(), HOME_PATH);
    }

    #[test]
    fn test_require_identity() {
        let session = SessionHandle::new();
        assert_eq!(
            session.require_identity().unwrap_err(),
            AuthError::NotAuthenticated
        );
    }
}
