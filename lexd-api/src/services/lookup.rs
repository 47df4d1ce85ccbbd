//! Lookup orchestration
//!
//! Per-request flow: normalize the word, read the store, then either
//! assemble the stored graph (enriching missing pronunciation audio in
//! parallel first) or fall back to the generative client. Generated
//! results are not written back; the store is populated by import only.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use lexd_common::{Error, Result};
use sqlx::SqlitePool;

use crate::db::{entries, pronunciations, synonyms};
use crate::models::{DefinitionView, ExampleView, Level, PronunciationView, WordEntry};
use crate::services::audio_resolver::{Accent, AudioSource};
use crate::services::completion_client::EntryGenerator;

/// Lookup orchestrator
pub struct LookupOrchestrator {
    db: SqlitePool,
    generator: Arc<dyn EntryGenerator>,
    audio: Arc<dyn AudioSource>,
}

impl LookupOrchestrator {
    pub fn new(
        db: SqlitePool,
        generator: Arc<dyn EntryGenerator>,
        audio: Arc<dyn AudioSource>,
    ) -> Self {
        Self {
            db,
            generator,
            audio,
        }
    }

    /// Resolve a word to an assembled dictionary entry
    pub async fn lookup(&self, raw_word: &str) -> Result<WordEntry> {
        let literal = raw_word.trim();
        let normalized = literal.to_lowercase();
        if normalized.is_empty() {
            return Err(Error::InvalidInput("word must not be empty".to_string()));
        }

        let graph = entries::load_graph(&self.db, literal, &normalized)
            .await
            .map_err(|e| {
                tracing::error!(word = %normalized, operation = "store_lookup", error = %e, "Store read failed");
                e
            })?;

        match graph {
            Some(graph) => {
                tracing::debug!(word = %normalized, "Store hit");
                self.assemble_hit(graph).await
            }
            None => {
                tracing::info!(word = %normalized, "Store miss; falling back to generation");
                let generated = self.generator.generate(&normalized).await.map_err(|e| {
                    tracing::error!(word = %normalized, operation = "generate", error = %e, "Generative fallback failed");
                    e
                })?;
                Ok(generated.into_word_entry(&normalized))
            }
        }
    }

    async fn assemble_hit(&self, graph: entries::EntryGraph) -> Result<WordEntry> {
        let entry = graph.entry;

        let enriched = self
            .enrich_audio(&entry.word, graph.pronunciations)
            .await;

        let synonyms = synonyms::list_for_entry(&self.db, entry.guid).await?;

        let definitions = graph
            .definitions
            .into_iter()
            .map(|(def, examples)| DefinitionView {
                pos: def.pos,
                definition_en: def.definition_en,
                definition_vi: def.definition_vi,
                level: Level::parse(&def.level),
                examples: examples
                    .into_iter()
                    .map(|e| ExampleView {
                        en: e.sentence_en,
                        vi: e.sentence_vi,
                    })
                    .collect(),
            })
            .collect();

        let word_forms: BTreeMap<String, String> = graph
            .word_forms
            .into_iter()
            .map(|form| (form.form_type, form.form_word))
            .collect();

        Ok(WordEntry {
            word: entry.word,
            pronunciations: enriched
                .into_iter()
                .map(|p| PronunciationView {
                    accent: p.accent,
                    ipa: p.ipa,
                    audio_url: p.audio_url,
                })
                .collect(),
            definitions,
            word_forms: if word_forms.is_empty() {
                None
            } else {
                Some(word_forms)
            },
            synonyms: if synonyms.is_empty() {
                None
            } else {
                Some(synonyms)
            },
            frequency_rank: entry.frequency_rank,
        })
    }

    /// Backfill audio for every pronunciation lacking a URL, one
    /// resolver call per row issued concurrently. Each successful
    /// resolution is persisted to its row; failures leave the row
    /// untouched and the response simply carries no audio.
    async fn enrich_audio(
        &self,
        word: &str,
        prons: Vec<pronunciations::Pronunciation>,
    ) -> Vec<pronunciations::Pronunciation> {
        let tasks = prons.into_iter().map(|mut pron| async move {
            if pron.audio_url.is_some() {
                return pron;
            }

            let accent = Accent::from_tag(&pron.accent);
            if let Some(url) = self.audio.resolve(word, accent).await {
                if let Err(e) = pronunciations::set_audio_url(&self.db, pron.guid, &url).await {
                    tracing::warn!(
                        word = %word,
                        accent = %pron.accent,
                        error = %e,
                        "Failed to persist backfilled audio URL"
                    );
                }
                pron.audio_url = Some(url);
            }
            pron
        });

        join_all(tasks).await
    }
}
