//! SQLite pool construction.
//!
//! `sqlx::migrate!` embeds `clarity-core/migrations` at compile time, so the
//! binary carries its own schema and only the database URL is a runtime
//! concern.

use crate::config::DatabaseConfig;
use crate::error::ClarityError;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, ClarityError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// A migrated in-memory database on a single pinned connection.
/// Every connection to `sqlite::memory:` is a separate database, so the
/// pool must never open a second one or recycle the first.
pub async fn connect_in_memory() -> Result<SqlitePool, ClarityError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), ClarityError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn health_check(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
