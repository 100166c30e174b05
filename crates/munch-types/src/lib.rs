//! Munch Types - Shared domain types
//!
//! This crate contains domain types used across Munch services:
//! - User identity and the denormalized follow graph
//! - Restaurant catalog entries and rating arithmetic
//! - Visits and favorite lists
//! - Pagination primitives

pub mod favorites;
pub mod page;
pub mod restaurant;
pub mod user;
pub mod visit;

pub use favorites::*;
pub use page::*;
pub use restaurant::*;
pub use user::*;
pub use visit::*;
