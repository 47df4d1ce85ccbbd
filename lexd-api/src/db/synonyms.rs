//! Synonym database operations
//!
//! Synonyms are stored as bare strings keyed (entry, synonym) and read
//! separately from the main entry graph fetch.

use lexd_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert synonym unless one already exists for (entry, synonym).
/// Returns true if a row was inserted.
pub async fn insert_if_absent(pool: &SqlitePool, entry_id: Uuid, synonym: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO synonyms (guid, entry_id, synonym)
        VALUES (?, ?, ?)
        ON CONFLICT(entry_id, synonym) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(entry_id.to_string())
    .bind(synonym)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List synonym strings for an entry
pub async fn list_for_entry(pool: &SqlitePool, entry_id: Uuid) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT synonym FROM synonyms
        WHERE entry_id = ?
        ORDER BY synonym
        "#,
    )
    .bind(entry_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("synonym")).collect())
}
