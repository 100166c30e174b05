//! PostgreSQL favorite list repository implementation
//!
//! Lists store their owner summary and restaurant entries as JSONB documents,
//! so reads never join back to the users or restaurants tables.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use munch_types::{FavoriteList, Page, Paged};

use crate::error::{DbError, DbResult};
use crate::models::FavoriteListRow;
use crate::repo::{CreateFavoriteList, FavoriteListRepository};

/// PostgreSQL favorite list repository
#[derive(Clone)]
pub struct PgFavoriteListRepository {
    pool: PgPool,
}

impl PgFavoriteListRepository {
    /// Create a new favorite list repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteListRepository for PgFavoriteListRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<FavoriteList>> {
        let row = sqlx::query_as::<_, FavoriteListRow>(
            r#"
            SELECT id, name, owner, restaurants
            FROM favorite_lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self, page: Page) -> DbResult<Paged<FavoriteList>> {
        let rows = sqlx::query_as::<_, FavoriteListRow>(
            r#"
            SELECT id, name, owner, restaurants
            FROM favorite_lists
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists")
            .fetch_one(&self.pool)
            .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn find_by_owner(&self, owner_id: Uuid, page: Page) -> DbResult<Paged<FavoriteList>> {
        let rows = sqlx::query_as::<_, FavoriteListRow>(
            r#"
            SELECT id, name, owner, restaurants
            FROM favorite_lists
            WHERE owner->>'id' = $1
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id.to_string())
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists WHERE owner->>'id' = $1")
                .bind(owner_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn create(&self, list: CreateFavoriteList) -> DbResult<FavoriteList> {
        let row = sqlx::query_as::<_, FavoriteListRow>(
            r#"
            INSERT INTO favorite_lists (id, name, owner, restaurants)
            VALUES ($1, $2, $3, '[]'::jsonb)
            RETURNING id, name, owner, restaurants
            "#,
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(Json(&list.owner))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, list: &FavoriteList) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE favorite_lists
            SET name = $2, restaurants = $3
            WHERE id = $1
            "#,
        )
        .bind(list.id.0)
        .bind(&list.name)
        .bind(Json(&list.restaurants))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM favorite_lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
