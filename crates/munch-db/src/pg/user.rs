//! PostgreSQL user repository implementation
//!
//! Follow edges are JSONB arrays on the user row itself. The edge mutations
//! are single UPDATE statements so the containment check and the append (or
//! removal) happen atomically within one document, matching the contract in
//! [`UserRepository`].

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use munch_types::{Page, Paged, User, UserSummary};

use crate::error::DbResult;
use crate::models::UserRow;
use crate::repo::{CreateUser, UserFilter, UserRepository};

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// JSONB probe matching any edge entry with the given id
    fn edge_probe(id: Uuid) -> Json<serde_json::Value> {
        Json(serde_json::json!([{ "id": id }]))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, rating, token,
                   following, followers, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, rating, token,
                   following, followers, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn search(&self, filter: &UserFilter, page: Page) -> DbResult<Paged<User>> {
        let name = filter.name_contains.as_deref();

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, rating, token,
                   following, followers, created_at
            FROM users
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(name)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn create(&self, user: CreateUser) -> DbResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, rating, following, followers)
            VALUES ($1, $2, $3, $4, 0, '[]'::jsonb, '[]'::jsonb)
            RETURNING id, name, email, password_hash, rating, token,
                      following, followers, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn set_token(&self, id: Uuid, token: Option<&str>) -> DbResult<()> {
        sqlx::query("UPDATE users SET token = $1 WHERE id = $2")
            .bind(token)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_points(&self, id: Uuid, points: f64) -> DbResult<()> {
        sqlx::query("UPDATE users SET rating = rating + $1 WHERE id = $2")
            .bind(points)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_following(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET following = following || $2
            WHERE id = $1 AND NOT following @> $3
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .bind(Self::edge_probe(entry.id.0))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_follower(&self, id: Uuid, entry: &UserSummary) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET followers = followers || $2
            WHERE id = $1 AND NOT followers @> $3
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .bind(Self::edge_probe(entry.id.0))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_following(&self, id: Uuid, target: Uuid) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET following = COALESCE(
                (SELECT jsonb_agg(entry)
                 FROM jsonb_array_elements(following) AS entry
                 WHERE entry->>'id' <> $2),
                '[]'::jsonb)
            WHERE id = $1 AND following @> $3
            "#,
        )
        .bind(id)
        .bind(target.to_string())
        .bind(Self::edge_probe(target))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_follower(&self, id: Uuid, follower: Uuid) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET followers = COALESCE(
                (SELECT jsonb_agg(entry)
                 FROM jsonb_array_elements(followers) AS entry
                 WHERE entry->>'id' <> $2),
                '[]'::jsonb)
            WHERE id = $1 AND followers @> $3
            "#,
        )
        .bind(id)
        .bind(follower.to_string())
        .bind(Self::edge_probe(follower))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
