use clarity_core::JournalEntry;
use sqlx::SqlitePool;

use crate::error::ServerError;
use crate::render::Templates;

/// Render every stored entry, newest first. Reads straight from the store.
pub async fn render_listing(
    pool: &SqlitePool,
    templates: &Templates,
) -> Result<String, ServerError> {
    let entries = JournalEntry::list_newest_first(pool).await?;
    tracing::debug!(count = entries.len(), "Rendering entry listing");
    Ok(templates.entries(&entries)?)
}
