//! Repository traits
//!
//! Async store interfaces, one per entity. Implementations guarantee
//! atomicity per single document per call; the follow-edge operations are
//! the one place that guarantee is load-bearing (atomic check-and-append on
//! one document, so a duplicate edge can never be written by racing calls).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use munch_types::{
    FavoriteList, Location, Page, Paged, Restaurant, User, UserSummary, Visit,
};

use crate::error::DbResult;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    /// Find a user by (already lowercased) email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// List users matching the filter, sorted by name
    async fn search(&self, filter: &UserFilter, page: Page) -> DbResult<Paged<User>>;

    /// Create a new user with an empty graph and zero rating
    async fn create(&self, user: CreateUser) -> DbResult<User>;

    /// Replace the cached bearer token (None clears it)
    async fn set_token(&self, id: Uuid, token: Option<&str>) -> DbResult<()>;

    /// Atomically add to the user's reward score
    async fn add_points(&self, id: Uuid, points: f64) -> DbResult<()>;

    /// Append `entry` to the user's following list unless an edge with the
    /// same id is already present. Returns whether the entry was appended;
    /// the check and the append are a single atomic document update.
    async fn add_following(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool>;

    /// Append `entry` to the user's followers list; same contract as
    /// [`add_following`](Self::add_following)
    async fn add_follower(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool>;

    /// Remove `target` from the user's following list. Returns whether an
    /// entry was removed.
    async fn remove_following(&self, id: Uuid, target: Uuid) -> DbResult<bool>;

    /// Remove `follower` from the user's followers list. Returns whether an
    /// entry was removed.
    async fn remove_follower(&self, id: Uuid, follower: Uuid) -> DbResult<bool>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User listing filter
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive name substring
    pub name_contains: Option<String>,
}

/// Restaurant repository trait
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Find a restaurant by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Restaurant>>;

    /// List restaurants matching the filter, sorted by name
    async fn search(&self, filter: &RestaurantFilter, page: Page) -> DbResult<Paged<Restaurant>>;

    /// Insert a catalog entry (used by the seeder and by tests)
    async fn create(&self, restaurant: Restaurant) -> DbResult<Restaurant>;

    /// Overwrite the running mean rating. A plain write; the caller's
    /// read-count-then-write sequence stays racy by contract.
    async fn set_rating(&self, id: Uuid, rating: f64) -> DbResult<()>;
}

/// Restaurant listing filter
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    /// Case-insensitive name substring
    pub name_contains: Option<String>,
    /// Match any of these genres
    pub genres: Option<Vec<String>>,
    /// Match any of these price ranges
    pub price_ranges: Option<Vec<i32>>,
    /// Keep restaurants within ±1 degree of this point
    pub near: Option<Location>,
}

/// Visit repository trait
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Find a visit by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Visit>>;

    /// All visits recorded by one user, newest first
    async fn find_by_user(&self, user_id: Uuid, page: Page) -> DbResult<Paged<Visit>>;

    /// One user's visits at one restaurant, newest first
    async fn find_by_user_and_restaurant(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        page: Page,
    ) -> DbResult<Paged<Visit>>;

    /// Total visits on record for a restaurant, across all users
    async fn count_for_restaurant(&self, restaurant_id: Uuid) -> DbResult<u64>;

    /// Record a visit. Visits are immutable; there is no update or delete.
    async fn create(&self, visit: CreateVisit) -> DbResult<Visit>;
}

/// Create visit input
#[derive(Debug, Clone)]
pub struct CreateVisit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub comment: Option<String>,
    pub rating: f64,
    pub date: DateTime<Utc>,
}

/// Favorite list repository trait
#[async_trait]
pub trait FavoriteListRepository: Send + Sync {
    /// Find a favorite list by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<FavoriteList>>;

    /// All favorite lists, any owner
    async fn find_all(&self, page: Page) -> DbResult<Paged<FavoriteList>>;

    /// Favorite lists owned by one user
    async fn find_by_owner(&self, owner_id: Uuid, page: Page) -> DbResult<Paged<FavoriteList>>;

    /// Create a favorite list
    async fn create(&self, list: CreateFavoriteList) -> DbResult<FavoriteList>;

    /// Persist the whole document (name and embedded restaurants)
    async fn update(&self, list: &FavoriteList) -> DbResult<()>;

    /// Delete a favorite list
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

/// Create favorite list input
#[derive(Debug, Clone)]
pub struct CreateFavoriteList {
    pub id: Uuid,
    pub name: String,
    pub owner: UserSummary,
}

/// All repositories behind shared trait objects.
///
/// Services are generic over the individual traits; this bundle is what the
/// binary (and test harnesses) pass around, so the Postgres and in-memory
/// backends are interchangeable at construction time.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub favorites: Arc<dyn FavoriteListRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: crate::DbPool) -> Self {
        Self {
            users: Arc::new(crate::pg::PgUserRepository::new(pool.clone())),
            restaurants: Arc::new(crate::pg::PgRestaurantRepository::new(pool.clone())),
            visits: Arc::new(crate::pg::PgVisitRepository::new(pool.clone())),
            favorites: Arc::new(crate::pg::PgFavoriteListRepository::new(pool)),
        }
    }

    /// Fresh in-memory repositories (each call is an isolated store)
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(crate::memory::MemoryUserRepository::new()),
            restaurants: Arc::new(crate::memory::MemoryRestaurantRepository::new()),
            visits: Arc::new(crate::memory::MemoryVisitRepository::new()),
            favorites: Arc::new(crate::memory::MemoryFavoriteListRepository::new()),
        }
    }
}
