//! In-memory repository implementations
//!
//! Backing store for tests and for running the API without PostgreSQL.
//! Each repository is a process-local [`DashMap`]; clones share the same
//! underlying maps, so a handle kept by a test observes writes made through
//! the service under test.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use munch_types::{FavoriteList, Page, Paged, Restaurant, User, UserSummary, Visit};

use crate::error::{DbError, DbResult};
use crate::repo::{
    CreateFavoriteList, CreateUser, CreateVisit, FavoriteListRepository, RestaurantFilter,
    RestaurantRepository, UserFilter, UserRepository, VisitRepository,
};

fn paginate<T>(items: Vec<T>, page: Page) -> Paged<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Paged { items, total }
}

/// In-memory user repository
#[derive(Default, Clone)]
pub struct MemoryUserRepository {
    users: Arc<DashMap<Uuid, User>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a user row entirely, index included
    pub fn remove(&self, id: Uuid) {
        if let Some((_, user)) = self.users.remove(&id) {
            self.by_email.remove(&user.email);
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn search(&self, filter: &UserFilter, page: Page) -> DbResult<Paged<User>> {
        let needle = filter.name_contains.as_deref().map(str::to_lowercase);
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|r| match needle.as_deref() {
                Some(n) => r.value().name.to_lowercase().contains(n),
                None => true,
            })
            .map(|r| r.value().clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(users, page))
    }

    async fn create(&self, user: CreateUser) -> DbResult<User> {
        let row = User {
            id: user.id.into(),
            name: user.name,
            email: user.email.clone(),
            password_hash: user.password_hash,
            rating: 0.0,
            token: None,
            following: Vec::new(),
            followers: Vec::new(),
            created_at: Utc::now(),
        };
        self.by_email.insert(user.email, user.id);
        self.users.insert(user.id, row.clone());
        Ok(row)
    }

    async fn set_token(&self, id: Uuid, token: Option<&str>) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.token = token.map(String::from);
        }
        Ok(())
    }

    async fn add_points(&self, id: Uuid, points: f64) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.rating += points;
        }
        Ok(())
    }

    async fn add_following(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool> {
        // get_mut holds the shard lock, so the presence check and the
        // append are atomic with respect to other callers
        match self.users.get_mut(&id) {
            Some(mut user) => {
                if user.following.iter().any(|e| e.id == entry.id) {
                    return Ok(false);
                }
                user.following.push(entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_follower(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                if user.followers.iter().any(|e| e.id == entry.id) {
                    return Ok(false);
                }
                user.followers.push(entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_following(&self, id: Uuid, target: Uuid) -> DbResult<bool> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                let before = user.following.len();
                user.following.retain(|e| e.id.0 != target);
                Ok(user.following.len() < before)
            }
            None => Ok(false),
        }
    }

    async fn remove_follower(&self, id: Uuid, follower: Uuid) -> DbResult<bool> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                let before = user.followers.len();
                user.followers.retain(|e| e.id.0 != follower);
                Ok(user.followers.len() < before)
            }
            None => Ok(false),
        }
    }
}

/// In-memory restaurant repository
#[derive(Default, Clone)]
pub struct MemoryRestaurantRepository {
    restaurants: Arc<DashMap<Uuid, Restaurant>>,
}

impl MemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for MemoryRestaurantRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Restaurant>> {
        Ok(self.restaurants.get(&id).map(|r| r.value().clone()))
    }

    async fn search(&self, filter: &RestaurantFilter, page: Page) -> DbResult<Paged<Restaurant>> {
        let needle = filter.name_contains.as_deref().map(str::to_lowercase);
        let mut restaurants: Vec<Restaurant> = self
            .restaurants
            .iter()
            .filter(|r| {
                let r = r.value();
                let name_ok = match needle.as_deref() {
                    Some(n) => r.name.to_lowercase().contains(n),
                    None => true,
                };
                let genres_ok = match &filter.genres {
                    Some(genres) => genres.iter().any(|g| r.genres.contains(g)),
                    None => true,
                };
                let price_ok = match &filter.price_ranges {
                    Some(ranges) => ranges.contains(&r.price_range),
                    None => true,
                };
                let near_ok = match filter.near {
                    Some(at) => {
                        (r.location.longitude - at.longitude).abs() <= 1.0
                            && (r.location.latitude - at.latitude).abs() <= 1.0
                    }
                    None => true,
                };
                name_ok && genres_ok && price_ok && near_ok
            })
            .map(|r| r.value().clone())
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(restaurants, page))
    }

    async fn create(&self, restaurant: Restaurant) -> DbResult<Restaurant> {
        self.restaurants.insert(restaurant.id.0, restaurant.clone());
        Ok(restaurant)
    }

    async fn set_rating(&self, id: Uuid, rating: f64) -> DbResult<()> {
        if let Some(mut restaurant) = self.restaurants.get_mut(&id) {
            restaurant.rating = rating;
        }
        Ok(())
    }
}

/// In-memory visit repository
#[derive(Default, Clone)]
pub struct MemoryVisitRepository {
    visits: Arc<DashMap<Uuid, Visit>>,
}

impl MemoryVisitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisitRepository for MemoryVisitRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Visit>> {
        Ok(self.visits.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_user(&self, user_id: Uuid, page: Page) -> DbResult<Paged<Visit>> {
        let mut visits: Vec<Visit> = self
            .visits
            .iter()
            .filter(|r| r.value().user_id.0 == user_id)
            .map(|r| r.value().clone())
            .collect();
        visits.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(paginate(visits, page))
    }

    async fn find_by_user_and_restaurant(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        page: Page,
    ) -> DbResult<Paged<Visit>> {
        let mut visits: Vec<Visit> = self
            .visits
            .iter()
            .filter(|r| {
                r.value().user_id.0 == user_id && r.value().restaurant_id.0 == restaurant_id
            })
            .map(|r| r.value().clone())
            .collect();
        visits.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(paginate(visits, page))
    }

    async fn count_for_restaurant(&self, restaurant_id: Uuid) -> DbResult<u64> {
        Ok(self
            .visits
            .iter()
            .filter(|r| r.value().restaurant_id.0 == restaurant_id)
            .count() as u64)
    }

    async fn create(&self, visit: CreateVisit) -> DbResult<Visit> {
        let row = Visit {
            id: visit.id.into(),
            user_id: visit.user_id.into(),
            restaurant_id: visit.restaurant_id.into(),
            comment: visit.comment,
            rating: visit.rating,
            date: visit.date,
        };
        self.visits.insert(visit.id, row.clone());
        Ok(row)
    }
}

/// In-memory favorite list repository
#[derive(Default, Clone)]
pub struct MemoryFavoriteListRepository {
    lists: Arc<DashMap<Uuid, FavoriteList>>,
}

impl MemoryFavoriteListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteListRepository for MemoryFavoriteListRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<FavoriteList>> {
        Ok(self.lists.get(&id).map(|r| r.value().clone()))
    }

    async fn find_all(&self, page: Page) -> DbResult<Paged<FavoriteList>> {
        let mut lists: Vec<FavoriteList> =
            self.lists.iter().map(|r| r.value().clone()).collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(lists, page))
    }

    async fn find_by_owner(&self, owner_id: Uuid, page: Page) -> DbResult<Paged<FavoriteList>> {
        let mut lists: Vec<FavoriteList> = self
            .lists
            .iter()
            .filter(|r| r.value().owner.id.0 == owner_id)
            .map(|r| r.value().clone())
            .collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(lists, page))
    }

    async fn create(&self, list: CreateFavoriteList) -> DbResult<FavoriteList> {
        let row = FavoriteList {
            id: list.id.into(),
            name: list.name,
            owner: list.owner,
            restaurants: Vec::new(),
        };
        self.lists.insert(list.id, row.clone());
        Ok(row)
    }

    async fn update(&self, list: &FavoriteList) -> DbResult<()> {
        match self.lists.get_mut(&list.id.0) {
            Some(mut existing) => {
                *existing = list.clone();
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.lists.remove(&id);
        Ok(())
    }
}
