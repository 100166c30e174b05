//! Auth errors
//!
//! Display strings double as wire messages, so the text here is part of the
//! API contract.

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token anywhere in the request
    #[error("Access token is missing")]
    TokenMissing,

    /// Token failed to decode; carries the codec's message verbatim
    #[error("{0}")]
    TokenMalformed(String),

    /// Token decoded but its expiry has passed
    #[error("Access token is expired")]
    TokenExpired,

    /// Token was minted for a user that no longer resolves
    #[error("User associated with token was not found")]
    UserNotFound,

    /// Unknown email or wrong password; the two are indistinguishable
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Signup without a usable name
    #[error("Missing parameters. A name must be specified.")]
    NameRequired,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TokenMissing
            | Self::TokenMalformed(_)
            | Self::TokenExpired
            | Self::UserNotFound
            | Self::InvalidCredentials => 401,
            Self::NameRequired => 400,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenMissing
            | Self::TokenMalformed(_)
            | Self::TokenExpired
            | Self::UserNotFound
            | Self::InvalidCredentials => "ACCESS_DENIED",
            Self::NameRequired => "BAD_REQUEST",
            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<munch_db::DbError> for AuthError {
    fn from(err: munch_db::DbError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::Database(err.to_string())
    }
}
