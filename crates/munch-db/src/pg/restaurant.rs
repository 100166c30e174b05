//! PostgreSQL restaurant repository implementation

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use munch_types::{Page, Paged, Restaurant};

use crate::error::DbResult;
use crate::models::RestaurantRow;
use crate::repo::{RestaurantFilter, RestaurantRepository};

/// PostgreSQL restaurant repository
#[derive(Clone)]
pub struct PgRestaurantRepository {
    pool: PgPool,
}

impl PgRestaurantRepository {
    /// Create a new restaurant repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Restaurant>> {
        let row = sqlx::query_as::<_, RestaurantRow>(
            r#"
            SELECT id, name, place_id, address, tel, latitude, longitude,
                   opening_hours, pictures, genres, price_range, rating
            FROM restaurants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn search(&self, filter: &RestaurantFilter, page: Page) -> DbResult<Paged<Restaurant>> {
        let name = filter.name_contains.as_deref();
        let genres = filter.genres.as_deref();
        let price_ranges = filter.price_ranges.as_deref();
        let (longitude, latitude) = match filter.near {
            Some(location) => (Some(location.longitude), Some(location.latitude)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, RestaurantRow>(
            r#"
            SELECT id, name, place_id, address, tel, latitude, longitude,
                   opening_hours, pictures, genres, price_range, rating
            FROM restaurants
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text[] IS NULL OR genres && $2)
              AND ($3::int4[] IS NULL OR price_range = ANY($3))
              AND ($4::float8 IS NULL
                   OR (longitude BETWEEN $4 - 1 AND $4 + 1
                       AND latitude BETWEEN $5 - 1 AND $5 + 1))
            ORDER BY name
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(name)
        .bind(genres)
        .bind(price_ranges)
        .bind(longitude)
        .bind(latitude)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM restaurants
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text[] IS NULL OR genres && $2)
              AND ($3::int4[] IS NULL OR price_range = ANY($3))
              AND ($4::float8 IS NULL
                   OR (longitude BETWEEN $4 - 1 AND $4 + 1
                       AND latitude BETWEEN $5 - 1 AND $5 + 1))
            "#,
        )
        .bind(name)
        .bind(genres)
        .bind(price_ranges)
        .bind(longitude)
        .bind(latitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn create(&self, restaurant: Restaurant) -> DbResult<Restaurant> {
        let row = sqlx::query_as::<_, RestaurantRow>(
            r#"
            INSERT INTO restaurants (id, name, place_id, address, tel, latitude, longitude,
                                     opening_hours, pictures, genres, price_range, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, name, place_id, address, tel, latitude, longitude,
                      opening_hours, pictures, genres, price_range, rating
            "#,
        )
        .bind(restaurant.id.0)
        .bind(&restaurant.name)
        .bind(&restaurant.place_id)
        .bind(&restaurant.address)
        .bind(&restaurant.tel)
        .bind(restaurant.location.latitude)
        .bind(restaurant.location.longitude)
        .bind(Json(&restaurant.opening_hours))
        .bind(&restaurant.pictures)
        .bind(&restaurant.genres)
        .bind(restaurant.price_range)
        .bind(restaurant.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn set_rating(&self, id: Uuid, rating: f64) -> DbResult<()> {
        sqlx::query("UPDATE restaurants SET rating = $1 WHERE id = $2")
            .bind(rating)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
