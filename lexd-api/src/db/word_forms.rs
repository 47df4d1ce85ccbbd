//! Word form database operations
//!
//! One (form-type, form-word) pair per entry and form type, e.g.
//! ("plural", "hellos").

use lexd_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Word form record
#[derive(Debug, Clone)]
pub struct WordForm {
    pub guid: Uuid,
    pub entry_id: Uuid,
    pub form_type: String,
    pub form_word: String,
}

impl WordForm {
    pub fn new(entry_id: Uuid, form_type: String, form_word: String) -> Self {
        Self {
            guid: Uuid::new_v4(),
            entry_id,
            form_type,
            form_word,
        }
    }
}

/// Insert word form unless one already exists for (entry, form type).
/// Returns true if a row was inserted.
pub async fn insert_if_absent(pool: &SqlitePool, form: &WordForm) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO word_forms (guid, entry_id, form_type, form_word)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(entry_id, form_type) DO NOTHING
        "#,
    )
    .bind(form.guid.to_string())
    .bind(form.entry_id.to_string())
    .bind(&form.form_type)
    .bind(&form.form_word)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List word forms for an entry
pub async fn list_for_entry(pool: &SqlitePool, entry_id: Uuid) -> Result<Vec<WordForm>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, entry_id, form_type, form_word
        FROM word_forms
        WHERE entry_id = ?
        ORDER BY form_type
        "#,
    )
    .bind(entry_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut forms = Vec::with_capacity(rows.len());
    for row in rows {
        let guid_str: String = row.get("guid");
        let entry_id_str: String = row.get("entry_id");
        forms.push(WordForm {
            guid: Uuid::parse_str(&guid_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad word form guid: {}", e)))?,
            entry_id: Uuid::parse_str(&entry_id_str)
                .map_err(|e| lexd_common::Error::Internal(format!("Bad entry guid: {}", e)))?,
            form_type: row.get("form_type"),
            form_word: row.get("form_word"),
        });
    }

    Ok(forms)
}
