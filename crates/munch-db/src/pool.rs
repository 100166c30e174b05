//! Database connection pool

use sqlx::migrate::MigrateError;
use sqlx::PgPool;

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Create a new database connection pool
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply any pending schema migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
