//! Application state for the Munch API service.

use std::sync::Arc;

use munch_auth_core::{AuthConfig, AuthService};
use munch_db::{DbPool, Repositories, RestaurantRepository, UserRepository, VisitRepository};
use munch_social_core::{FollowGraph, VisitTracker};

use crate::config::Config;

/// Auth flows over whichever user store the state was built with
pub type Auth = AuthService<dyn UserRepository>;
/// Follow graph over the shared user store
pub type Graph = FollowGraph<dyn UserRepository>;
/// Visit tracker over the shared stores
pub type Tracker = VisitTracker<dyn UserRepository, dyn RestaurantRepository, dyn VisitRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login, signup, token verification, logout
    pub auth: Arc<Auth>,
    /// Follow and unfollow flows
    pub graph: Arc<Graph>,
    /// Visit recording and listings
    pub tracker: Arc<Tracker>,
    /// Store repositories (for the handlers that are plain CRUD)
    pub repos: Repositories,
    /// Present only when running against Postgres; probed by `/ready`
    pub pool: Option<DbPool>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    ///
    /// # Panics
    ///
    /// Panics if `config.token_secret` is shorter than the minimum signing
    /// key length; [`Config::from_env`](crate::config::Config::from_env)
    /// validates this.
    pub fn new(repos: Repositories, pool: Option<DbPool>, config: Config) -> Self {
        let auth = AuthService::new(
            AuthConfig::new(config.token_secret.as_str()),
            Arc::clone(&repos.users),
        );
        let graph = FollowGraph::new(Arc::clone(&repos.users));
        let tracker = VisitTracker::new(
            Arc::clone(&repos.users),
            Arc::clone(&repos.restaurants),
            Arc::clone(&repos.visits),
        );

        Self {
            auth: Arc::new(auth),
            graph: Arc::new(graph),
            tracker: Arc::new(tracker),
            repos,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
