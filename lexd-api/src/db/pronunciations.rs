//! Pronunciation database operations
//!
//! At most one row exists per (entry, accent); the audio URL is the only
//! column ever updated in place (lazy audio backfill).

use lexd_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Pronunciation record
#[derive(Debug, Clone)]
pub struct Pronunciation {
    pub guid: Uuid,
    pub entry_id: Uuid,
    pub accent: String,
    pub ipa: String,
    pub audio_url: Option<String>,
}

impl Pronunciation {
    pub fn new(entry_id: Uuid, accent: String, ipa: String, audio_url: Option<String>) -> Self {
        Self {
            guid: Uuid::new_v4(),
            entry_id,
            accent,
            ipa,
            audio_url,
        }
    }
}

/// Insert pronunciation unless one already exists for (entry, accent).
/// Returns true if a row was inserted.
pub async fn insert_if_absent(pool: &SqlitePool, pron: &Pronunciation) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO pronunciations (guid, entry_id, accent, ipa, audio_url)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(entry_id, accent) DO NOTHING
        "#,
    )
    .bind(pron.guid.to_string())
    .bind(pron.entry_id.to_string())
    .bind(&pron.accent)
    .bind(&pron.ipa)
    .bind(&pron.audio_url)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List pronunciations for an entry
pub async fn list_for_entry(pool: &SqlitePool, entry_id: Uuid) -> Result<Vec<Pronunciation>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, entry_id, accent, ipa, audio_url
        FROM pronunciations
        WHERE entry_id = ?
        ORDER BY accent
        "#,
    )
    .bind(entry_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut prons = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        let entry_id_str: String = row.get("entry_id");
        prons.push(Pronunciation {
            guid: Uuid::parse_str(&guid_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad pronunciation guid: {}", e)))?,
            entry_id: Uuid::parse_str(&entry_id_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad entry guid: {}", e)))?,
            accent: row.get("accent"),
            ipa: row.get("ipa"),
            audio_url: row.get("audio_url"),
        });
    }

    Ok(prons)
}

/// Write a backfilled audio URL to an existing pronunciation row
pub async fn set_audio_url(pool: &SqlitePool, guid: Uuid, audio_url: &str) -> Result<()> {
    sqlx::query("UPDATE pronunciations SET audio_url = ? WHERE guid = ?")
        .bind(audio_url)
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::{self, Entry};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool_with_entry() -> (SqlitePool, Uuid) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        lexd_common::db::create_tables(&pool).await.unwrap();

        let entry = Entry::new("hello".to_string(), None);
        entries::insert_if_absent(&pool, &entry).await.unwrap();
        (pool, entry.guid)
    }

    #[tokio::test]
    async fn test_insert_if_absent_guards_accent() {
        let (pool, entry_id) = test_pool_with_entry().await;

        let first = Pronunciation::new(entry_id, "US".to_string(), "/həˈloʊ/".to_string(), None);
        let second = Pronunciation::new(entry_id, "US".to_string(), "/other/".to_string(), None);

        assert!(insert_if_absent(&pool, &first).await.unwrap());
        assert!(!insert_if_absent(&pool, &second).await.unwrap());

        let prons = list_for_entry(&pool, entry_id).await.unwrap();
        assert_eq!(prons.len(), 1);
        assert_eq!(prons[0].ipa, "/həˈloʊ/");
    }

    #[tokio::test]
    async fn test_set_audio_url_updates_in_place() {
        let (pool, entry_id) = test_pool_with_entry().await;

        let pron = Pronunciation::new(entry_id, "UK".to_string(), "/həˈləʊ/".to_string(), None);
        insert_if_absent(&pool, &pron).await.unwrap();

        set_audio_url(&pool, pron.guid, "https://audio.example/hello-uk.mp3")
            .await
            .unwrap();

        let prons = list_for_entry(&pool, entry_id).await.unwrap();
        assert_eq!(
            prons[0].audio_url.as_deref(),
            Some("https://audio.example/hello-uk.mp3")
        );
    }
}
