//! Request/response shapes for the lexd API
//!
//! The lookup response is assembled from stored rows on a hit and from
//! the generative client's validated output on a miss; both paths
//! produce the same `WordEntry` shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Definition difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    /// Parse a stored level string, defaulting unknown values
    pub fn parse(value: &str) -> Self {
        match value {
            "beginner" => Level::Beginner,
            "advanced" => Level::Advanced,
            _ => Level::Intermediate,
        }
    }
}

/// One pronunciation in a lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronunciationView {
    pub accent: String,
    pub ipa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// One example sentence pair in a lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleView {
    pub en: String,
    pub vi: String,
}

/// One definition in a lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionView {
    pub pos: String,
    pub definition_en: String,
    pub definition_vi: String,
    pub level: Level,
    pub examples: Vec<ExampleView>,
}

/// Assembled dictionary entry returned by the lookup entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub pronunciations: Vec<PronunciationView>,
    pub definitions: Vec<DefinitionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_forms: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<i64>,
}

/// Pronunciation supplied by the import entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPronunciation {
    pub accent: String,
    pub ipa: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Example sentence supplied alongside an imported definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportExample {
    pub en: String,
    pub vi: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Definition supplied by the import entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDefinition {
    pub pos: String,
    pub definition_en: String,
    pub definition_vi: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub examples: Vec<ImportExample>,
}

/// Payload accepted by the import entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPayload {
    pub word: String,
    #[serde(default)]
    pub word_normalized: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub frequency_rank: Option<i64>,
    #[serde(default)]
    pub pronunciations: Vec<ImportPronunciation>,
    #[serde(default)]
    pub definitions: Vec<ImportDefinition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub word_forms: BTreeMap<String, String>,
}

/// Import entry point response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub word: String,
}

/// Search entry point response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub words: Vec<String>,
}

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Translation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_round_trip() {
        assert_eq!(Level::parse("beginner"), Level::Beginner);
        assert_eq!(Level::parse("advanced"), Level::Advanced);
        assert_eq!(Level::parse("intermediate"), Level::Intermediate);
        assert_eq!(Level::parse("garbage"), Level::Intermediate);
        assert_eq!(Level::Beginner.as_str(), "beginner");
    }

    #[test]
    fn test_word_entry_omits_empty_sections() {
        let entry = WordEntry {
            word: "hello".to_string(),
            pronunciations: vec![],
            definitions: vec![],
            word_forms: None,
            synonyms: None,
            frequency_rank: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("word_forms").is_none());
        assert!(json.get("synonyms").is_none());
        assert!(json.get("frequency_rank").is_none());
    }

    #[test]
    fn test_import_payload_defaults() {
        let payload: ImportPayload = serde_json::from_str(r#"{"word": "hello"}"#).unwrap();
        assert!(payload.pronunciations.is_empty());
        assert!(payload.definitions.is_empty());
        assert!(payload.word_normalized.is_none());
    }
}
