//! Definition and example database operations
//!
//! Definitions carry no natural-key constraint: the import path appends
//! a fresh batch on every call, numbered from 1 within that batch, and
//! lookups order by the stored `sort_order`.

use lexd_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Definition record
#[derive(Debug, Clone)]
pub struct Definition {
    pub guid: Uuid,
    pub entry_id: Uuid,
    pub pos: String,
    pub definition_en: String,
    pub definition_vi: String,
    pub level: String,
    pub sort_order: i64,
}

impl Definition {
    pub fn new(
        entry_id: Uuid,
        pos: String,
        definition_en: String,
        definition_vi: String,
        level: String,
        sort_order: i64,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            entry_id,
            pos,
            definition_en,
            definition_vi,
            level,
            sort_order,
        }
    }
}

/// Example sentence record
#[derive(Debug, Clone)]
pub struct Example {
    pub guid: Uuid,
    pub definition_id: Uuid,
    pub sentence_en: String,
    pub sentence_vi: String,
    pub source: Option<String>,
}

impl Example {
    pub fn new(
        definition_id: Uuid,
        sentence_en: String,
        sentence_vi: String,
        source: Option<String>,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            definition_id,
            sentence_en,
            sentence_vi,
            source,
        }
    }
}

/// Insert a definition row (always appended, never deduplicated)
pub async fn insert_definition(pool: &SqlitePool, def: &Definition) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO definitions (guid, entry_id, pos, definition_en, definition_vi, level, sort_order)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(def.guid.to_string())
    .bind(def.entry_id.to_string())
    .bind(&def.pos)
    .bind(&def.definition_en)
    .bind(&def.definition_vi)
    .bind(&def.level)
    .bind(def.sort_order)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert an example sentence row
pub async fn insert_example(pool: &SqlitePool, example: &Example) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO examples (guid, definition_id, sentence_en, sentence_vi, source)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(example.guid.to_string())
    .bind(example.definition_id.to_string())
    .bind(&example.sentence_en)
    .bind(&example.sentence_vi)
    .bind(&example.source)
    .execute(pool)
    .await?;

    Ok(())
}

/// List definitions for an entry, ascending by stored sort order
pub async fn list_for_entry(pool: &SqlitePool, entry_id: Uuid) -> Result<Vec<Definition>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, entry_id, pos, definition_en, definition_vi, level, sort_order
        FROM definitions
        WHERE entry_id = ?
        ORDER BY sort_order
        "#,
    )
    .bind(entry_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut defs = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        let entry_id_str: String = row.get("entry_id");
        defs.push(Definition {
            guid: Uuid::parse_str(&guid_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad definition guid: {}", e)))?,
            entry_id: Uuid::parse_str(&entry_id_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad entry guid: {}", e)))?,
            pos: row.get("pos"),
            definition_en: row.get("definition_en"),
            definition_vi: row.get("definition_vi"),
            level: row.get("level"),
            sort_order: row.get("sort_order"),
        });
    }

    Ok(defs)
}

/// List example sentences for a definition
pub async fn list_examples(pool: &SqlitePool, definition_id: Uuid) -> Result<Vec<Example>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, definition_id, sentence_en, sentence_vi, source
        FROM examples
        WHERE definition_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(definition_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut examples = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        let definition_id_str: String = row.get("definition_id");
        examples.push(Example {
            guid: Uuid::parse_str(&guid_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad example guid: {}", e)))?,
            definition_id: Uuid::parse_str(&definition_id_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad definition guid: {}", e)))?,
            sentence_en: row.get("sentence_en"),
            sentence_vi: row.get("sentence_vi"),
            source: row.get("source"),
        });
    }

    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::{self, Entry};
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_list_for_entry_sorts_by_stored_order() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        lexd_common::db::create_tables(&pool).await.unwrap();

        let entry = Entry::new("set".to_string(), None);
        entries::insert_if_absent(&pool, &entry).await.unwrap();

        // Insert out of order
        for (text, order) in [("third", 3), ("first", 1), ("second", 2)] {
            let def = Definition::new(
                entry.guid,
                "noun".to_string(),
                text.to_string(),
                text.to_string(),
                "intermediate".to_string(),
                order,
            );
            insert_definition(&pool, &def).await.unwrap();
        }

        let defs = list_for_entry(&pool, entry.guid).await.unwrap();
        let texts: Vec<&str> = defs.iter().map(|d| d.definition_en.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
