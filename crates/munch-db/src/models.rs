//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Denormalized document fields (edge lists, embedded restaurants, owner
//! summaries) live in JSONB columns and decode through `sqlx::types::Json`.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use munch_types::{
    FavoriteList, Location, OpeningHours, Restaurant, User, UserSummary, Visit,
};

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub rating: f64,
    pub token: Option<String>,
    pub following: Json<Vec<UserSummary>>,
    pub followers: Json<Vec<UserSummary>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            rating: row.rating,
            token: row.token,
            following: row.following.0,
            followers: row.followers.0,
            created_at: row.created_at,
        }
    }
}

/// Restaurant row from the database
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub place_id: Option<String>,
    pub address: String,
    pub tel: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: Json<OpeningHours>,
    pub pictures: Vec<String>,
    pub genres: Vec<String>,
    pub price_range: i32,
    pub rating: f64,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id.into(),
            name: row.name,
            place_id: row.place_id,
            address: row.address,
            tel: row.tel,
            location: Location {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            opening_hours: row.opening_hours.0,
            pictures: row.pictures,
            genres: row.genres,
            price_range: row.price_range,
            rating: row.rating,
        }
    }
}

/// Visit row from the database
#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub comment: Option<String>,
    pub rating: f64,
    pub date: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: row.id.into(),
            user_id: row.user_id.into(),
            restaurant_id: row.restaurant_id.into(),
            comment: row.comment,
            rating: row.rating,
            date: row.date,
        }
    }
}

/// Favorite list row from the database
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteListRow {
    pub id: Uuid,
    pub name: String,
    pub owner: Json<UserSummary>,
    pub restaurants: Json<Vec<Restaurant>>,
}

impl From<FavoriteListRow> for FavoriteList {
    fn from(row: FavoriteListRow) -> Self {
        FavoriteList {
            id: row.id.into(),
            name: row.name,
            owner: row.owner.0,
            restaurants: row.restaurants.0,
        }
    }
}
