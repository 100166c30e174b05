//! Munch DB - Document store abstractions
//!
//! Store layer for Munch services. Every entity has an async repository
//! trait with two interchangeable implementations: PostgreSQL (production)
//! and a DashMap-backed in-memory store (tests). Both promise atomicity per
//! single document per operation and nothing more; cross-document
//! consistency is the caller's problem.
//!
//! # Example
//!
//! ```rust,ignore
//! use munch_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/munch").await?;
//! let repos = Repositories::postgres(pool);
//!
//! let user = repos.users.find_by_email("ana@example.com").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repo::*;
