//! Database initialization and schema
//!
//! The dictionary schema is a root `entries` table owning four child
//! tables through cascading foreign keys. Natural-key uniqueness is
//! enforced by the schema itself (UNIQUE constraints) so that import
//! writers can rely on conditional inserts instead of check-then-insert
//! sequences.

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the database file (created if missing) and ensures the
/// schema exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create the dictionary tables if they don't exist
///
/// Also used by tests against in-memory pools.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            guid TEXT PRIMARY KEY,
            word TEXT NOT NULL UNIQUE,
            word_normalized TEXT NOT NULL UNIQUE,
            language TEXT NOT NULL DEFAULT 'en',
            frequency_rank INTEGER,
            pos_tags TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pronunciations (
            guid TEXT PRIMARY KEY,
            entry_id TEXT NOT NULL REFERENCES entries(guid) ON DELETE CASCADE,
            accent TEXT NOT NULL,
            ipa TEXT NOT NULL,
            audio_url TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(entry_id, accent)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS definitions (
            guid TEXT PRIMARY KEY,
            entry_id TEXT NOT NULL REFERENCES entries(guid) ON DELETE CASCADE,
            pos TEXT NOT NULL,
            definition_en TEXT NOT NULL,
            definition_vi TEXT NOT NULL,
            level TEXT NOT NULL DEFAULT 'intermediate',
            sort_order INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS examples (
            guid TEXT PRIMARY KEY,
            definition_id TEXT NOT NULL REFERENCES definitions(guid) ON DELETE CASCADE,
            sentence_en TEXT NOT NULL,
            sentence_vi TEXT NOT NULL,
            source TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_forms (
            guid TEXT PRIMARY KEY,
            entry_id TEXT NOT NULL REFERENCES entries(guid) ON DELETE CASCADE,
            form_type TEXT NOT NULL,
            form_word TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(entry_id, form_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS synonyms (
            guid TEXT PRIMARY KEY,
            entry_id TEXT NOT NULL REFERENCES entries(guid) ON DELETE CASCADE,
            synonym TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(entry_id, synonym)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_definitions_entry ON definitions(entry_id, sort_order)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_examples_definition ON examples(definition_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized");

    Ok(())
}
