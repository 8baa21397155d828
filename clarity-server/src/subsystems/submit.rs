use clarity_core::{JournalEntry, ReflectionGenerator};
use sqlx::SqlitePool;

use crate::error::ServerError;

/// Reflect on `text`, then store it with the reflection as one row.
///
/// The generator runs before the insert, so a generator error leaves the
/// store untouched. Whether generator failures surface here at all depends
/// on whether it is wrapped in `FallbackReflectionGenerator`.
pub async fn submit_entry(
    text: &str,
    pool: &SqlitePool,
    generator: &dyn ReflectionGenerator,
) -> Result<JournalEntry, ServerError> {
    let insight = generator.generate(text).await?;
    tracing::debug!(generator = generator.name(), insight = ?insight, "Generated reflection");

    let entry = JournalEntry::insert(pool, text, Some(&insight)).await?;

    tracing::info!(
        id = entry.id,
        has_insight = !insight.is_empty(),
        "Stored journal entry"
    );

    Ok(entry)
}
