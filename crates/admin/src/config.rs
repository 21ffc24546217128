//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run the demo console locally.
//!
//! - `STOCKROOM_HOST` - Bind address (default: 127.0.0.1)
//! - `STOCKROOM_PORT` - Listen port (default: 3001)
//! - `STOCKROOM_BASE_URL` - Public URL, decides the cookie `Secure` flag
//!   (default: `http://localhost:3001`)
//! - `STOCKROOM_DEMO_PASSWORD` - Password shared by the demo accounts
//!   (default: password123)
//! - `STOCKROOM_REPLY_DELAY_MIN_MS` / `STOCKROOM_REPLY_DELAY_MAX_MS` - Range of
//!   the assistant's simulated thinking time (default: 1000 / 2000)
//! - `STOCKROOM_STATIC_DIR` - Directory served under `/static` (default: the
//!   crate's `static/` directory)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0
//!
//! ## Optional (TLS)
//! - `STOCKROOM_TLS_CERT` - PEM-encoded certificate chain
//! - `STOCKROOM_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DEMO_PASSWORD: &str = "password123";
const DEFAULT_REPLY_DELAY_MIN_MS: u64 = 1000;
const DEFAULT_REPLY_DELAY_MAX_MS: u64 = 2000;

/// Static assets shipped with the crate, independent of the working directory.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the console
    pub base_url: String,
    /// Password accepted for every demo account
    pub demo_password: SecretString,
    /// Simulated assistant thinking time
    pub reply_delay: ReplyDelayConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Bounds of the assistant's randomized reply delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelayConfig {
    /// Shortest delay.
    pub min: Duration,
    /// Longest delay.
    pub max: Duration,
}

impl Default for ReplyDelayConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(DEFAULT_REPLY_DELAY_MIN_MS),
            max: Duration::from_millis(DEFAULT_REPLY_DELAY_MAX_MS),
        }
    }
}

impl ReplyDelayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let min = parse_env_or("STOCKROOM_REPLY_DELAY_MIN_MS", DEFAULT_REPLY_DELAY_MIN_MS)?;
        let max = parse_env_or("STOCKROOM_REPLY_DELAY_MAX_MS", DEFAULT_REPLY_DELAY_MAX_MS)?;
        if min > max {
            return Err(ConfigError::InvalidEnvVar(
                "STOCKROOM_REPLY_DELAY_MIN_MS".to_string(),
                format!("{min} is greater than STOCKROOM_REPLY_DELAY_MAX_MS ({max})"),
            ));
        }
        Ok(Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        })
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("STOCKROOM_TLS_CERT");
        let key_pem = get_optional_env("STOCKROOM_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "STOCKROOM_TLS_*".to_string(),
                "Both STOCKROOM_TLS_CERT and STOCKROOM_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the TLS pair is only half configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOCKROOM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_HOST".to_string(), e.to_string()))?;
        let port = parse_env_or("STOCKROOM_PORT", 3001_u16)?;
        let base_url = get_env_or_default("STOCKROOM_BASE_URL", &format!("http://localhost:{port}"));
        let demo_password = SecretString::from(get_env_or_default(
            "STOCKROOM_DEMO_PASSWORD",
            DEFAULT_DEMO_PASSWORD,
        ));
        let log_format = match get_optional_env("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            base_url,
            demo_password,
            reply_delay: ReplyDelayConfig::from_env()?,
            static_dir: PathBuf::from(get_env_or_default(
                "STOCKROOM_STATIC_DIR",
                DEFAULT_STATIC_DIR,
            )),
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or("SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: parse_env_or("SENTRY_TRACES_SAMPLE_RATE", 0.1_f32)?,
            tls: TlsConfig::from_env()?,
        })
    }

    /// Configuration for tests and local tooling: defaults, no delay.
    #[must_use]
    pub fn for_local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            demo_password: SecretString::from(DEFAULT_DEMO_PASSWORD),
            reply_delay: ReplyDelayConfig {
                min: Duration::ZERO,
                max: Duration::ZERO,
            },
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        }
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig::for_local();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_is_secure_follows_base_url() {
        let mut config = AdminConfig::for_local();
        assert!(!config.is_secure());
        config.base_url = "https://console.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_default_reply_delay() {
        let delay = ReplyDelayConfig::default();
        assert_eq!(delay.min, Duration::from_secs(1));
        assert_eq!(delay.max, Duration::from_secs(2));
    }

    #[test]
    fn test_static_dir_does_not_depend_on_working_directory() {
        let config = AdminConfig::for_local();
        assert!(config.static_dir.is_absolute());
        assert!(config.static_dir.join("admin.css").is_file());
    }

    #[test]
    fn test_parse_env_or_uses_default_when_unset() {
        let value = parse_env_or("STOCKROOM_TEST_SURELY_UNSET_VARIABLE", 7_u16).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let mut config = AdminConfig::for_local();
        config.demo_password = SecretString::from("hunter2-demo");
        config.tls = Some(TlsConfig {
            cert_pem: "-----BEGIN CERTIFICATE-----".to_string(),
            key_pem: SecretString::from("super_secret_private_key"),
        });

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-demo"));
        assert!(!debug_output.contains("super_secret_private_key"));
    }
}
