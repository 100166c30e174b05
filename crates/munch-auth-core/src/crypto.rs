//! HMAC signing primitives
//!
//! Token signatures must be verified in constant time; everything here
//! exists to make that the only option the rest of the crate has.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

/// Pre-validated HMAC-SHA256 key.
///
/// Key length is checked once at construction so signing can never fail at
/// call sites.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns an error if the key is shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        // Cannot fail: key length was validated in new()
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key_bytes)
            .expect("HMAC key length already validated");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Comparison time depends only on the length of the slices, never on where
/// the first difference sits. Length mismatch returns `false` immediately;
/// length is not secret.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    // XOR accumulator: zero only when every byte pair matches
    let result = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_equal() {
        assert!(constant_time_eq(b"signature-bytes", b"signature-bytes"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_constant_time_eq_different() {
        assert!(!constant_time_eq(b"signature-bytes", b"signature-bytez"));
    }

    #[test]
    fn test_constant_time_eq_length_mismatch() {
        assert!(!constant_time_eq(b"short", b"short-but-longer"));
    }

    #[test]
    fn test_key_too_short_rejected() {
        let result = HmacKey::new("way-too-short");
        assert!(matches!(result, Err(HmacKeyError::KeyTooShort { .. })));
    }

    #[test]
    fn test_key_boundary_lengths() {
        assert!(HmacKey::new("k".repeat(31)).is_err());
        assert!(HmacKey::new("k".repeat(32)).is_ok());
        assert!(HmacKey::new("k".repeat(64)).is_ok());
    }

    #[test]
    fn test_sign_is_deterministic() {
        let key = HmacKey::new("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(key.sign(b"payload"), key.sign(b"payload"));
        assert_ne!(key.sign(b"payload"), key.sign(b"payloae"));
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = HmacKey::new("0123456789abcdef0123456789abcdef").unwrap();
        let signature = key.sign(b"bearer token body");
        assert!(key.verify(b"bearer token body", &signature));
        assert!(!key.verify(b"different body", &signature));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = HmacKey::new("0123456789abcdef0123456789abcdef").unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("key_length"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
