//! Munch Auth Core - Authentication business logic
//!
//! Bearer-token minting and verification, password hashing, and the
//! login/signup/logout flows shared by the API service.

pub mod config;
pub mod crypto;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use crypto::{constant_time_eq, HmacKey, HmacKeyError};
pub use error::*;
pub use service::*;
pub use token::{TokenCodec, TokenError, TokenPayload};
