//! Import merging for externally sourced dictionary entries
//!
//! Folds one entry payload into the store, safe to re-run on the same
//! input. Merge strategy: the entry row and all natural-keyed
//! sub-records (pronunciations, word forms, synonyms) are conditional
//! inserts that never overwrite existing data; definitions are always
//! appended as a fresh batch numbered from 1 within that batch.
//!
//! The steps run sequentially without a surrounding transaction, so a
//! failure partway leaves earlier writes committed. The failure is
//! reported naming the offending word.

use lexd_common::{Error, Result};
use sqlx::SqlitePool;

use crate::db::{definitions, entries, pronunciations, synonyms, word_forms};
use crate::models::{ImportDefinition, ImportPayload};

/// Import merger
pub struct ImportMerger {
    db: SqlitePool,
}

impl ImportMerger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Fold one payload into the store; returns the canonical word
    pub async fn import_entry(&self, payload: ImportPayload) -> Result<String> {
        let word = payload.word.trim().to_string();
        if word.is_empty() {
            return Err(Error::InvalidInput("import word must not be empty".to_string()));
        }

        match self.merge(&word, &payload).await {
            Ok(()) => {
                tracing::info!(word = %word, "Imported entry");
                Ok(word)
            }
            Err(e) => {
                tracing::error!(word = %word, error = %e, "Import failed");
                Err(Error::ImportFailed {
                    word,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn merge(&self, word: &str, payload: &ImportPayload) -> Result<()> {
        let entry = self.find_or_create_entry(word, payload).await?;

        for pron in &payload.pronunciations {
            let row = pronunciations::Pronunciation::new(
                entry.guid,
                pron.accent.clone(),
                pron.ipa.clone(),
                pron.audio_url.clone(),
            );
            if !pronunciations::insert_if_absent(&self.db, &row).await? {
                tracing::debug!(word = %word, accent = %pron.accent, "Pronunciation already present");
            }
        }

        for (index, def) in payload.definitions.iter().enumerate() {
            let row = definitions::Definition::new(
                entry.guid,
                def.pos.clone(),
                def.definition_en.clone(),
                def.definition_vi.clone(),
                def.level.as_str().to_string(),
                (index + 1) as i64,
            );
            definitions::insert_definition(&self.db, &row).await?;

            for example in &def.examples {
                let example_row = definitions::Example::new(
                    row.guid,
                    example.en.clone(),
                    example.vi.clone(),
                    example.source.clone(),
                );
                definitions::insert_example(&self.db, &example_row).await?;
            }
        }

        for (form_type, form_word) in &payload.word_forms {
            let form = word_forms::WordForm::new(entry.guid, form_type.clone(), form_word.clone());
            word_forms::insert_if_absent(&self.db, &form).await?;
        }

        for synonym in &payload.synonyms {
            synonyms::insert_if_absent(&self.db, entry.guid, synonym).await?;
        }

        Ok(())
    }

    /// Reuse the entry row for the literal word, creating it if absent.
    /// No field of an existing row is overwritten.
    async fn find_or_create_entry(
        &self,
        word: &str,
        payload: &ImportPayload,
    ) -> Result<entries::Entry> {
        if let Some(existing) = entries::find_by_literal_word(&self.db, word).await? {
            return Ok(existing);
        }

        let mut entry = entries::Entry::new(word.to_string(), payload.word_normalized.clone());
        if let Some(language) = &payload.language {
            entry.language = language.clone();
        }
        entry.frequency_rank = payload.frequency_rank;
        entry.pos_tags = distinct_pos_tags(&payload.definitions);

        entries::insert_if_absent(&self.db, &entry).await?;

        // Re-read in case a concurrent importer won the conditional insert
        entries::find_by_literal_word(&self.db, word)
            .await?
            .ok_or_else(|| Error::Internal(format!("entry vanished after insert: {}", word)))
    }
}

/// Distinct definition POS tags in first-appearance order
fn distinct_pos_tags(definitions: &[ImportDefinition]) -> Option<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for def in definitions {
        if !tags.iter().any(|t| t == &def.pos) {
            tags.push(def.pos.clone());
        }
    }

    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}
