//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::services::{
    Clock, ConversationHandle, DemoCredentials, DestinationRegistry, Responder, SessionHandle,
    SystemClock, ThinkingDelay,
};
use crate::store::Store;

/// Clients idle for longer than this are forgotten, matching the cookie expiry.
const CLIENT_IDLE_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on remembered clients.
const CLIENT_CAPACITY: u64 = 10_000;

/// Per-browser state: the session slot and the assistant conversation.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub session: SessionHandle,
    pub conversation: ConversationHandle,
}

impl ClientState {
    /// Sign out: clear the session and drop the conversation.
    pub fn sign_out(&self) {
        self.session.clear_session();
        self.conversation.close();
    }
}

/// Client states keyed by the id stored in the browser's session cookie.
#[derive(Clone)]
pub struct ClientRegistry {
    cache: Cache<Uuid, ClientState>,
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.cache.entry_count())
            .finish()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(CLIENT_CAPACITY)
            .time_to_idle(CLIENT_IDLE_EXPIRY)
            .build();
        Self { cache }
    }

    /// State for `client_id`, created empty on first use.
    pub async fn client(&self, client_id: Uuid) -> ClientState {
        self.cache
            .get_with(client_id, async { ClientState::default() })
            .await
    }

    /// Forget a client entirely.
    pub async fn forget(&self, client_id: Uuid) {
        self.cache.invalidate(&client_id).await;
    }
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Store,
    credentials: DemoCredentials,
    destinations: DestinationRegistry,
    responder: Responder,
    thinking_delay: ThinkingDelay,
    clients: ClientRegistry,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build state with the demo data set and the system clock.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build state with an explicit clock.
    #[must_use]
    pub fn with_clock(config: AdminConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let store = Store::seeded(now);
        let credentials =
            DemoCredentials::shared(Arc::clone(&store.users), config.demo_password.clone());
        let thinking_delay = ThinkingDelay {
            min: config.reply_delay.min,
            max: config.reply_delay.max,
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                credentials,
                destinations: DestinationRegistry::standard(),
                responder: Responder::standard(),
                thinking_delay,
                clients: ClientRegistry::new(),
                clock,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn credentials(&self) -> &DemoCredentials {
        &self.inner.credentials
    }

    #[must_use]
    pub fn destinations(&self) -> &DestinationRegistry {
        &self.inner.destinations
    }

    #[must_use]
    pub fn responder(&self) -> Responder {
        self.inner.responder
    }

    #[must_use]
    pub fn thinking_delay(&self) -> ThinkingDelay {
        self.inner.thinking_delay
    }

    #[must_use]
    pub fn clients(&self) -> &ClientRegistry {
        &self.inner.clients
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_client_id_shares_state() {
        let registry = ClientRegistry::new();
        let id = Uuid::new_v4();
        let first = registry.client(id).await;
        first.conversation.get_or_open(|| "hi".to_string(), chrono::Utc::now());

        let again = registry.client(id).await;
        assert!(again.conversation.is_open());

        let other = registry.client(Uuid::new_v4()).await;
        assert!(!other.conversation.is_open());
    }

    #[tokio::test]
    async fn test_forget_starts_over() {
        let registry = ClientRegistry::new();
        let id = Uuid::new_v4();
        registry
            .client(id)
            .await
            .conversation
            .get_or_open(|| "hi".to_string(), chrono::Utc::now());
        registry.forget(id).await;
        assert!(!registry.client(id).await.conversation.is_open());
    }

    #[tokio::test]
    async fn test_state_uses_configured_delay() {
        let state = AppState::new(AdminConfig::for_local());
        assert_eq!(state.thinking_delay(), ThinkingDelay::NONE);
        assert_eq!(state.credentials().accounts().await.len(), 3);
    }
}
