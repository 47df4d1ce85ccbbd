//! Shared helpers for lexd-api integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use lexd_api::models::ImportPayload;
use lexd_api::services::audio_resolver::{Accent, AudioBuckets, AudioSource};
use lexd_api::services::completion_client::{EntryGenerator, GeneratedEntry, Translator};
use lexd_api::AppState;

/// Create an in-memory database with the real schema
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory database");

    lexd_common::db::create_tables(&pool)
        .await
        .expect("Failed to initialize database schema");

    pool
}

/// Scripted generative client
pub struct MockGenerator {
    entry: Option<GeneratedEntry>,
    pub calls: AtomicUsize,
}

impl MockGenerator {
    /// Always returns the given entry
    pub fn returning(entry: GeneratedEntry) -> Self {
        Self {
            entry: Some(entry),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with a generation-unparsable condition
    pub fn unparsable() -> Self {
        Self {
            entry: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntryGenerator for MockGenerator {
    async fn generate(&self, _word: &str) -> lexd_common::Result<GeneratedEntry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.entry {
            Some(entry) => Ok(entry.clone()),
            None => Err(lexd_common::Error::GenerationUnparsable(
                "no JSON object found in completion".to_string(),
            )),
        }
    }
}

/// Audio source backed by fixed accent buckets
pub struct MockAudio {
    buckets: AudioBuckets,
    pub calls: AtomicUsize,
}

impl MockAudio {
    pub fn with_buckets(us: Option<&str>, uk: Option<&str>) -> Self {
        Self {
            buckets: AudioBuckets {
                us: us.map(str::to_string),
                uk: uk.map(str::to_string),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn none() -> Self {
        Self::with_buckets(None, None)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSource for MockAudio {
    async fn resolve(&self, _word: &str, accent: Accent) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.buckets.for_accent(accent).map(str::to_string)
    }
}

/// Canned translator
pub struct MockTranslator {
    reply: String,
}

impl MockTranslator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> lexd_common::Result<String> {
        Ok(self.reply.clone())
    }
}

/// Assemble an AppState over mocks
pub fn test_state(
    pool: SqlitePool,
    generator: Arc<MockGenerator>,
    audio: Arc<MockAudio>,
) -> AppState {
    AppState::new(
        pool,
        generator,
        audio,
        Arc::new(MockTranslator::replying("xin chao")),
    )
}

/// Import payload for "Hello" with two audio-less pronunciations and one
/// definition
pub fn hello_payload() -> ImportPayload {
    serde_json::from_value(serde_json::json!({
        "word": "Hello",
        "frequency_rank": 300,
        "pronunciations": [
            {"accent": "US", "ipa": "/həˈloʊ/"},
            {"accent": "UK", "ipa": "/həˈləʊ/"}
        ],
        "definitions": [
            {
                "pos": "exclamation",
                "definition_en": "used as a greeting",
                "definition_vi": "xin chao",
                "level": "beginner",
                "examples": [
                    {"en": "Hello, how are you?", "vi": "Xin chao, ban khoe khong?"}
                ]
            }
        ],
        "synonyms": ["hi"],
        "word_forms": {"plural": "hellos"}
    }))
    .expect("valid payload")
}

/// A well-formed generated entry for "serendipity"
pub fn serendipity_entry() -> GeneratedEntry {
    serde_json::from_value(serde_json::json!({
        "word": "serendipity",
        "pronunciations": [{"accent": "US", "ipa": "/ˌserənˈdipəti/"}],
        "definitions": [
            {
                "pos": "noun",
                "definition_en": "finding good things by chance",
                "definition_vi": "su tinh co may man",
                "level": "advanced",
                "examples": []
            }
        ],
        "synonyms": ["luck", "fluke"]
    }))
    .expect("valid generated entry")
}
