use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// One row of `journal_entries`. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub content: String,
    pub insight: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Insert a new entry stamped with the current time.
    pub async fn insert(
        pool: &SqlitePool,
        content: &str,
        insight: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        Self::insert_at(pool, content, insight, Utc::now()).await
    }

    pub async fn insert_at(
        pool: &SqlitePool,
        content: &str,
        insight: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (content, insight, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, content, insight, created_at
            "#,
        )
        .bind(content)
        .bind(insight)
        .bind(created_at)
        .fetch_one(pool)
        .await
    }

    /// All entries, newest first. Equal timestamps fall back to id order.
    pub async fn list_newest_first(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, content, insight, created_at
            FROM journal_entries
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM journal_entries")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
