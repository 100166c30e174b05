//! Configuration types for the auth service

use std::time::Duration;

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing (at least 32 bytes)
    pub token_secret: String,
    /// How long minted tokens stay valid
    pub token_duration: Duration,
}

impl AuthConfig {
    /// Create a new auth config with the default 24-hour token lifetime
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_duration: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Set token lifetime
    pub fn with_token_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }
}
