//! Munch API
//!
//! Restaurant social service: accounts, a follow graph, visit tracking
//! with reward points and restaurant ratings, and favorite lists.
//!
//! ## Public endpoints
//!
//! - `GET /` - Welcome line
//! - `GET /status` - Service status
//! - `POST /login` - Authenticate, mint a bearer token
//! - `POST /signup` - Create an account
//! - `POST /logout` - Clear the cached token (idempotent)
//! - `GET /token` - Current principal, coarse 401s
//!
//! ## Protected endpoints (bearer token)
//!
//! - `GET /tokenInfo` - Current principal, fine-grained 401s
//! - `GET /users`, `GET /users/{id}` - User directory
//! - `POST /follow`, `DELETE /follow/{id}` - Follow graph
//! - `GET+POST /users/{id}/restaurants/visits` - Visit log
//! - `GET /users/{id}/restaurants/visits/{visitId}` - One visit
//! - `GET /users/{id}/restaurants/{restaurantId}/visits` - Visits at one place
//! - `GET /restaurants`, `GET /restaurants/{id}` - Catalog
//! - `GET+POST /favorites`, `GET+PUT+DELETE /favorites/{id}` - Favorite lists
//! - `POST /favorites/{id}/restaurants`,
//!   `DELETE /favorites/{id}/restaurants/{restaurantId}` - List contents
//! - `GET /users/{id}/favorites` - Lists owned by one user
//!
//! ## Health endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (store connectivity)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
