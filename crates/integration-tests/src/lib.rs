//! Integration tests for the Stockroom console.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`;
//! no server or network is needed.
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! [`TestConsole`] carries the session cookie between requests like a
//! browser would.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use stockroom_admin::app;
use stockroom_admin::config::AdminConfig;
use stockroom_admin::middleware::SESSION_COOKIE_NAME;
use stockroom_admin::state::AppState;

/// Password of every demo account under [`AdminConfig::for_local`].
pub const DEMO_PASSWORD: &str = "password123";

/// Response parts the tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Whether the response redirects to `path`.
    #[must_use]
    pub fn redirects_to(&self, path: &str) -> bool {
        self.status.is_redirection() && self.location.as_deref() == Some(path)
    }
}

/// One browser talking to one console instance.
pub struct TestConsole {
    router: Router,
    cookie: Option<String>,
    pub state: AppState,
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConsole {
    /// A console with the demo data and no reply delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::new(AdminConfig::for_local()))
    }

    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            router: app(state.clone()),
            cookie: None,
            state,
        }
    }

    /// A second browser against the same console.
    #[must_use]
    pub fn another_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
            state: self.state.clone(),
        }
    }

    /// Send a request, remembering any session cookie the console sets.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body is not UTF-8.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }
        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default();
            if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// POST an url-encoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    #[allow(clippy::unwrap_used)]
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    #[allow(clippy::unwrap_used)]
    pub async fn post_json(&mut self, path: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Sign in with a demo account.
    pub async fn login(&mut self, email: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", DEMO_PASSWORD)])
            .await
    }
}
