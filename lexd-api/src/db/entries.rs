//! Entry database operations
//!
//! Entries are addressed by either the case-preserving `word` or the
//! lowercase `word_normalized` key; both carry UNIQUE constraints.

use lexd_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{definitions, pronunciations, word_forms};

/// Entry record (root row for one word)
#[derive(Debug, Clone)]
pub struct Entry {
    pub guid: Uuid,
    pub word: String,
    pub word_normalized: String,
    pub language: String,
    pub frequency_rank: Option<i64>,
    pub pos_tags: Option<Vec<String>>,
}

impl Entry {
    /// Create a new entry; the normalized key defaults to the lowercased
    /// trimmed word when not supplied
    pub fn new(word: String, word_normalized: Option<String>) -> Self {
        let word_normalized =
            word_normalized.unwrap_or_else(|| word.trim().to_lowercase());
        Self {
            guid: Uuid::new_v4(),
            word,
            word_normalized,
            language: "en".to_string(),
            frequency_rank: None,
            pos_tags: None,
        }
    }
}

/// Full nested read of one entry and its owned children
#[derive(Debug, Clone)]
pub struct EntryGraph {
    pub entry: Entry,
    pub pronunciations: Vec<pronunciations::Pronunciation>,
    pub definitions: Vec<(definitions::Definition, Vec<definitions::Example>)>,
    pub word_forms: Vec<word_forms::WordForm>,
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
    let guid_str: String = row.get("guid");
    let pos_tags_json: Option<String> = row.get("pos_tags");

    Ok(Entry {
        guid: Uuid::parse_str(&guid_str)
            .map_err(|e| lexd_common::Error::Internal(format!("Bad entry guid: {}", e)))?,
        word: row.get("word"),
        word_normalized: row.get("word_normalized"),
        language: row.get("language"),
        frequency_rank: row.get("frequency_rank"),
        pos_tags: pos_tags_json.and_then(|s| serde_json::from_str(&s).ok()),
    })
}

/// Find entry matching either the exact stored word or the normalized key
pub async fn find_by_word(
    pool: &SqlitePool,
    literal: &str,
    normalized: &str,
) -> Result<Option<Entry>> {
    let row = sqlx::query(
        r#"
        SELECT guid, word, word_normalized, language, frequency_rank, pos_tags
        FROM entries
        WHERE word = ? OR word_normalized = ?
        "#,
    )
    .bind(literal)
    .bind(normalized)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(entry_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Find entry by the exact stored word only
pub async fn find_by_literal_word(pool: &SqlitePool, word: &str) -> Result<Option<Entry>> {
    let row = sqlx::query(
        r#"
        SELECT guid, word, word_normalized, language, frequency_rank, pos_tags
        FROM entries
        WHERE word = ?
        "#,
    )
    .bind(word)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(entry_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Insert entry unless a row with the same word (or normalized key)
/// already exists. Returns true if a row was inserted.
///
/// The conditional insert leans on the UNIQUE constraints so concurrent
/// importers of the same new word cannot create duplicate rows.
pub async fn insert_if_absent(pool: &SqlitePool, entry: &Entry) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO entries (guid, word, word_normalized, language, frequency_rank, pos_tags)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(entry.guid.to_string())
    .bind(&entry.word)
    .bind(&entry.word_normalized)
    .bind(&entry.language)
    .bind(entry.frequency_rank)
    .bind(
        entry
            .pos_tags
            .as_ref()
            .map(|tags| serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())),
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load the full nested graph for one entry in one logical read
pub async fn load_graph(
    pool: &SqlitePool,
    literal: &str,
    normalized: &str,
) -> Result<Option<EntryGraph>> {
    let Some(entry) = find_by_word(pool, literal, normalized).await? else {
        return Ok(None);
    };

    let prons = pronunciations::list_for_entry(pool, entry.guid).await?;
    let defs = definitions::list_for_entry(pool, entry.guid).await?;
    let mut definitions_with_examples = Vec::with_capacity(defs.len());
    for def in defs {
        let examples = definitions::list_examples(pool, def.guid).await?;
        definitions_with_examples.push((def, examples));
    }
    let forms = word_forms::list_for_entry(pool, entry.guid).await?;

    Ok(Some(EntryGraph {
        entry,
        pronunciations: prons,
        definitions: definitions_with_examples,
        word_forms: forms,
    }))
}

/// Prefix search over normalized words for autocomplete
///
/// More common words (lower frequency rank) sort first; unranked words
/// trail in alphabetical order.
pub async fn search_prefix(pool: &SqlitePool, prefix: &str, limit: i64) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT word FROM entries
        WHERE word_normalized LIKE ? || '%'
        ORDER BY frequency_rank IS NULL, frequency_rank, word_normalized
        LIMIT ?
        "#,
    )
    .bind(prefix)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("word")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory database");
        lexd_common::db::create_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_find_by_word_matches_literal_and_normalized() {
        let pool = test_pool().await;

        let entry = Entry::new("Hello".to_string(), None);
        insert_if_absent(&pool, &entry).await.unwrap();

        let by_literal = find_by_word(&pool, "Hello", "nope").await.unwrap().unwrap();
        let by_normalized = find_by_word(&pool, "nope", "hello").await.unwrap().unwrap();

        assert_eq!(by_literal.guid, by_normalized.guid);
        assert_eq!(by_literal.word, "Hello");
        assert_eq!(by_literal.word_normalized, "hello");
    }

    #[tokio::test]
    async fn test_insert_if_absent_skips_duplicates() {
        let pool = test_pool().await;

        let first = Entry::new("hello".to_string(), None);
        let second = Entry::new("hello".to_string(), None);

        assert!(insert_if_absent(&pool, &first).await.unwrap());
        assert!(!insert_if_absent(&pool, &second).await.unwrap());

        let survivor = find_by_literal_word(&pool, "hello").await.unwrap().unwrap();
        assert_eq!(survivor.guid, first.guid);
    }

    #[tokio::test]
    async fn test_pos_tags_round_trip() {
        let pool = test_pool().await;

        let mut entry = Entry::new("run".to_string(), None);
        entry.pos_tags = Some(vec!["verb".to_string(), "noun".to_string()]);
        insert_if_absent(&pool, &entry).await.unwrap();

        let loaded = find_by_literal_word(&pool, "run").await.unwrap().unwrap();
        assert_eq!(
            loaded.pos_tags,
            Some(vec!["verb".to_string(), "noun".to_string()])
        );
    }

    #[tokio::test]
    async fn test_search_prefix_ranks_common_words_first() {
        let pool = test_pool().await;

        let mut rare = Entry::new("hermit".to_string(), None);
        rare.frequency_rank = Some(9000);
        let mut common = Entry::new("hello".to_string(), None);
        common.frequency_rank = Some(300);
        let unranked = Entry::new("heuristic".to_string(), None);

        insert_if_absent(&pool, &rare).await.unwrap();
        insert_if_absent(&pool, &common).await.unwrap();
        insert_if_absent(&pool, &unranked).await.unwrap();

        let words = search_prefix(&pool, "he", 10).await.unwrap();
        assert_eq!(words, vec!["hello", "hermit", "heuristic"]);
    }
}
