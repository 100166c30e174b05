//! Configuration for the Munch API service.

use std::time::Duration;

use munch_auth_core::HmacKey;

/// Signing secret used when `TOKEN_SECRET` is unset. Fine for local
/// development against the in-memory store, never for production.
pub const DEV_TOKEN_SECRET: &str = "munch-dev-secret-do-not-use-in-production";

/// Munch API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL; absent means the in-memory store
    pub database_url: Option<String>,
    /// Token signing secret
    pub token_secret: String,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database. Unset (or blank) selects the in-memory store.
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());

        // Token secret, validated up front so the signing key constructor
        // can rely on it.
        let token_secret = match std::env::var("TOKEN_SECRET") {
            Ok(secret) => {
                if secret.len() < HmacKey::MIN_KEY_LENGTH {
                    return Err(ConfigError::Invalid("TOKEN_SECRET"));
                }
                secret
            }
            Err(_) => {
                tracing::warn!("TOKEN_SECRET not set, using the insecure development secret");
                DEV_TOKEN_SECRET.to_string()
            }
        };

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        Ok(Self {
            http_port,
            database_url,
            token_secret,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
