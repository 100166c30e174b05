//! Password hashing
//!
//! bcrypt with a low fixed work factor; every call salts independently, so
//! equal passwords produce distinct digests.

use bcrypt::BcryptError;

/// bcrypt work factor applied to new passwords
pub const HASH_COST: u32 = 8;

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Check a password against a stored digest.
///
/// A digest that fails to parse counts as a mismatch; callers only ever see
/// yes or no.
pub fn verify_password(password: &str, digest: &str) -> bool {
    bcrypt::verify(password, digest).unwrap_or(false)
}
