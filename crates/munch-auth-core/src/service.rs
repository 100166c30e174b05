//! Auth service - login, signup, and per-request token verification

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use munch_db::{CreateUser, UserRepository};
use munch_types::User;

use crate::{
    config::AuthConfig,
    password,
    token::{TokenCodec, TokenPayload},
    AuthError,
};

/// Authentication service
///
/// Owns the token codec and the user store handle. Every protected request
/// resolves its principal through [`verify`](Self::verify) before any domain
/// logic runs; login and signup are the only paths that touch passwords.
pub struct AuthService<U: UserRepository + ?Sized> {
    codec: TokenCodec,
    token_duration_hours: u32,
    users: Arc<U>,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    /// Create a new auth service
    ///
    /// # Panics
    /// Panics if the configured token secret is shorter than 32 bytes.
    pub fn new(config: AuthConfig, users: Arc<U>) -> Self {
        let token_duration_hours = (config.token_duration.as_secs() / 3600) as u32;

        Self {
            codec: TokenCodec::new(config.token_secret.as_bytes()),
            token_duration_hours,
            users,
        }
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// Mints a fresh 24-hour token, caches it on the user record, and
    /// returns the user carrying that token. Unknown email and wrong
    /// password produce the same failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.to_lowercase();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if password::verify_password(password, &user.password_hash) => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let payload = TokenPayload::new(user.id, self.token_duration_hours);
        let token = self.codec.encode(&payload).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            AuthError::Internal("Failed to mint token".to_string())
        })?;
        self.users.set_token(user.id.0, Some(&token)).await?;

        let mut user = user;
        user.token = Some(token);
        Ok(user)
    }

    /// Register a new account.
    ///
    /// Returns the created user without minting a token; clients log in
    /// afterwards. A taken email fails exactly like a bad login, so
    /// registered addresses stay unguessable.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::NameRequired);
        }

        let email = email.to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = password::hash_password(password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthError::Internal("Failed to create account".to_string())
        })?;

        let user = self
            .users
            .create(CreateUser {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    // =========================================================================
    // Token Verification
    // =========================================================================

    /// Resolve a candidate token to its user.
    ///
    /// The rejection order is fixed: missing, malformed, expired, unknown
    /// issuer. Expiry is checked here, not in the codec, so each failure
    /// keeps its own 401 message.
    #[instrument(skip(self, candidate))]
    pub async fn verify(&self, candidate: Option<&str>) -> Result<User, AuthError> {
        let token = candidate.ok_or(AuthError::TokenMissing)?;

        let payload = self
            .codec
            .decode(token)
            .map_err(|e| AuthError::TokenMalformed(e.to_string()))?;

        if payload.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        // An issuer that does not parse cannot resolve to a user
        let issuer = payload.issuer().ok_or(AuthError::UserNotFound)?;
        self.users
            .find_by_id(issuer.0)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Resolve the current principal, reporting failures coarsely.
    ///
    /// Anything wrong with a present token collapses to "user not found";
    /// this path confirms only whether a token maps to an account.
    #[instrument(skip(self, candidate))]
    pub async fn get_token(&self, candidate: Option<&str>) -> Result<User, AuthError> {
        match self.verify(candidate).await {
            Ok(user) => Ok(user),
            Err(_) if candidate.is_some() => Err(AuthError::UserNotFound),
            Err(_) => Err(AuthError::TokenMissing),
        }
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Clear the caller's cached token.
    ///
    /// Succeeds whether or not the request resolved to a principal; logging
    /// out twice is fine. Minted tokens keep verifying until they expire.
    #[instrument(skip(self, candidate))]
    pub async fn logout(&self, candidate: Option<&str>) -> Result<(), AuthError> {
        if let Ok(user) = self.verify(candidate).await {
            self.users.set_token(user.id.0, None).await?;
        }
        Ok(())
    }
}

impl<U: UserRepository + ?Sized> std::fmt::Debug for AuthService<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_duration_hours", &self.token_duration_hours)
            .finish_non_exhaustive()
    }
}
