//! Bearer token encoding and decoding
//!
//! Tokens are `base64url(json payload) . base64url(hmac-sha256 signature)`,
//! integrity-protected but not encrypted. The codec proves who minted a
//! token and nothing else: expiry lives in the payload and is the caller's
//! decision to enforce, so an expired token still decodes successfully.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use munch_types::UserId;

use crate::crypto::{constant_time_eq, HmacKey};

/// Signed token payload: who it was minted for and when it stops working
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// ID of the user this token was issued to
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Expiration timestamp, unix milliseconds
    #[serde(rename = "exp")]
    pub expires: i64,
}

impl TokenPayload {
    /// Mint a payload for a user, expiring `duration_hours` from now
    pub fn new(issuer: UserId, duration_hours: u32) -> Self {
        let expires = Utc::now().timestamp_millis() + i64::from(duration_hours) * 60 * 60 * 1000;
        Self {
            issuer: issuer.to_string(),
            expires,
        }
    }

    /// Whether the expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.expires
    }

    /// The issuing user's ID, if the stored value parses
    pub fn issuer(&self) -> Option<UserId> {
        UserId::parse(&self.issuer).ok()
    }
}

/// Token decode/encode failures.
///
/// Messages are surfaced to clients verbatim, so they name what went wrong
/// without leaking anything about the key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Not enough or too many segments")]
    Segments,

    #[error("Signature verification failed")]
    Signature,

    #[error("Invalid token payload")]
    Payload,

    #[error("Failed to serialize token payload")]
    Serialize,
}

/// Signs and verifies bearer tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    hmac_key: HmacKey,
}

impl TokenCodec {
    /// Create a codec from the signing secret.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 bytes.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let hmac_key = HmacKey::new(secret).expect("token secret must be at least 32 bytes");
        Self { hmac_key }
    }

    /// Encode and sign a payload
    pub fn encode(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let payload_json = serde_json::to_vec(payload).map_err(|_| TokenError::Serialize)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = self.compute_signature(&payload_b64);
        Ok(format!("{payload_b64}.{signature}"))
    }

    /// Verify a token's signature and decode its payload.
    ///
    /// Does not check expiry; `decode(encode(p)) == p` holds for payloads
    /// that expired long ago.
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let parts: Vec<&str> = token.rsplitn(2, '.').collect();
        if parts.len() != 2 {
            return Err(TokenError::Segments);
        }

        let (signature, payload_b64) = (parts[0], parts[1]);

        // Signature first, in constant time; payload bytes stay untrusted
        // until this passes
        let expected = self.compute_signature(payload_b64);
        if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            return Err(TokenError::Signature);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Payload)?;
        serde_json::from_slice(&payload_json).map_err(|_| TokenError::Payload)
    }

    /// HMAC-SHA256 over the encoded payload, base64url encoded
    fn compute_signature(&self, data: &str) -> String {
        let signature = self.hmac_key.sign(data.as_bytes());
        URL_SAFE_NO_PAD.encode(signature)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
