//! PostgreSQL visit repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use munch_types::{Page, Paged, Visit};

use crate::error::DbResult;
use crate::models::VisitRow;
use crate::repo::{CreateVisit, VisitRepository};

/// PostgreSQL visit repository
#[derive(Clone)]
pub struct PgVisitRepository {
    pool: PgPool,
}

impl PgVisitRepository {
    /// Create a new visit repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Visit>> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, user_id, restaurant_id, comment, rating, date
            FROM visits
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_user(&self, user_id: Uuid, page: Page) -> DbResult<Paged<Visit>> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, user_id, restaurant_id, comment, rating, date
            FROM visits
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn find_by_user_and_restaurant(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        page: Page,
    ) -> DbResult<Paged<Visit>> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, user_id, restaurant_id, comment, rating, date
            FROM visits
            WHERE user_id = $1 AND restaurant_id = $2
            ORDER BY date DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(restaurant_id)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visits WHERE user_id = $1 AND restaurant_id = $2",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn count_for_restaurant(&self, restaurant_id: Uuid) -> DbResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(total as u64)
    }

    async fn create(&self, visit: CreateVisit) -> DbResult<Visit> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visits (id, user_id, restaurant_id, comment, rating, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, restaurant_id, comment, rating, date
            "#,
        )
        .bind(visit.id)
        .bind(visit.user_id)
        .bind(visit.restaurant_id)
        .bind(&visit.comment)
        .bind(visit.rating)
        .bind(visit.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
