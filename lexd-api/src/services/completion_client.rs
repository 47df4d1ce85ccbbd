//! Text-completion API client
//!
//! Produces structured dictionary entries for words the store does not
//! have, and doubles as the free-text translator. The completion
//! endpoint returns prose; entry generation extracts the JSON object
//! between the first `{` and the last `}` and validates it against an
//! explicit schema before anything reaches a caller.

use async_trait::async_trait;
use lexd_common::config::CompletionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    DefinitionView, ExampleView, Level, PronunciationView, WordEntry,
};

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);
const ENTRY_MAX_TOKENS: u32 = 1500;
const TRANSLATION_MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.3;

/// Prompt section delimiter; also sent as the stop sequence so the
/// completion halts exactly after the model's turn.
const DELIMITER: &str = "###";

/// Completion client errors
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Completion response contained no choices")]
    EmptyResponse,

    #[error("Unparsable generation: {0}")]
    Unparsable(String),
}

impl From<CompletionError> for lexd_common::Error {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Timeout => {
                lexd_common::Error::UpstreamTimeout("completion endpoint".to_string())
            }
            CompletionError::Unparsable(reason) => {
                lexd_common::Error::GenerationUnparsable(reason)
            }
            other => lexd_common::Error::Internal(other.to_string()),
        }
    }
}

/// Completion endpoint request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f64,
    max_tokens: u32,
    stop: Vec<&'a str>,
}

/// Completion endpoint response body; only `choices[0].text` is used
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

/// Pronunciation produced by the generative client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPronunciation {
    pub accent: String,
    pub ipa: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Example sentence produced by the generative client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedExample {
    pub en: String,
    pub vi: String,
}

/// Definition produced by the generative client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDefinition {
    pub pos: String,
    pub definition_en: String,
    pub definition_vi: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub examples: Vec<GeneratedExample>,
}

/// Schema the extracted completion JSON must satisfy
///
/// Lenient on optional sections, strict on definition shape; a parsed
/// object with no definitions is rejected as unparsable rather than
/// returned half-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub pronunciations: Vec<GeneratedPronunciation>,
    #[serde(default)]
    pub definitions: Vec<GeneratedDefinition>,
    #[serde(default)]
    pub word_forms: BTreeMap<String, String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl GeneratedEntry {
    /// Convert into the lookup response shape; `fallback_word` fills in
    /// when the model omitted the word field
    pub fn into_word_entry(self, fallback_word: &str) -> WordEntry {
        let word = if self.word.trim().is_empty() {
            fallback_word.to_string()
        } else {
            self.word
        };

        WordEntry {
            word,
            pronunciations: self
                .pronunciations
                .into_iter()
                .map(|p| PronunciationView {
                    accent: p.accent,
                    ipa: p.ipa,
                    audio_url: p.audio_url,
                })
                .collect(),
            definitions: self
                .definitions
                .into_iter()
                .map(|d| DefinitionView {
                    pos: d.pos,
                    definition_en: d.definition_en,
                    definition_vi: d.definition_vi,
                    level: d.level,
                    examples: d
                        .examples
                        .into_iter()
                        .map(|e| ExampleView { en: e.en, vi: e.vi })
                        .collect(),
                })
                .collect(),
            word_forms: if self.word_forms.is_empty() {
                None
            } else {
                Some(self.word_forms)
            },
            synonyms: if self.synonyms.is_empty() {
                None
            } else {
                Some(self.synonyms)
            },
            frequency_rank: None,
        }
    }
}

/// Generates dictionary entries for words absent from the store
#[async_trait]
pub trait EntryGenerator: Send + Sync {
    async fn generate(&self, word: &str) -> lexd_common::Result<GeneratedEntry>;
}

/// Free-text translation provider
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> lexd_common::Result<String>;
}

/// Text-completion API client
pub struct CompletionClient {
    http_client: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Send one completion request and return `choices[0].text`
    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            temperature: TEMPERATURE,
            max_tokens,
            stop: vec![DELIMITER],
        };

        let mut builder = self.http_client.post(&self.config.base_url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(status.as_u16(), error_text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(CompletionError::EmptyResponse)
    }

    /// Generate a structured entry for a word the store does not have
    pub async fn generate_entry(&self, word: &str) -> Result<GeneratedEntry, CompletionError> {
        tracing::debug!(word = %word, "Requesting generated dictionary entry");

        let text = self
            .complete(build_entry_prompt(word), ENTRY_MAX_TOKENS)
            .await?;

        parse_generated_entry(&text)
    }

    /// Translate free text between two languages; returns the trimmed
    /// completion with no further processing
    pub async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, CompletionError> {
        let prompt = build_translation_prompt(
            text,
            language_name(source_lang),
            language_name(target_lang),
        );

        let completion = self.complete(prompt, TRANSLATION_MAX_TOKENS).await?;
        Ok(completion.trim().to_string())
    }
}

#[async_trait]
impl EntryGenerator for CompletionClient {
    async fn generate(&self, word: &str) -> lexd_common::Result<GeneratedEntry> {
        self.generate_entry(word).await.map_err(Into::into)
    }
}

#[async_trait]
impl Translator for CompletionClient {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> lexd_common::Result<String> {
        self.translate_text(text, source_lang, target_lang)
            .await
            .map_err(Into::into)
    }
}

fn classify_request_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Network(err.to_string())
    }
}

/// Resolve a language code to its display name; unknown codes pass
/// through unchanged
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "vi" => "Vietnamese",
        "fr" => "French",
        "es" => "Spanish",
        "de" => "German",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ru" => "Russian",
        "th" => "Thai",
        other => other,
    }
}

fn build_entry_prompt(word: &str) -> String {
    format!(
        r#"{delim} Instruction:
You are an English-Vietnamese dictionary. Produce a dictionary entry for the word "{word}".
Respond with a single JSON object and nothing else, following exactly this shape:
{{
  "word": "example",
  "pronunciations": [{{"accent": "US", "ipa": "/ig'zaempel/"}}],
  "definitions": [
    {{
      "pos": "noun",
      "definition_en": "a thing characteristic of its kind",
      "definition_vi": "vi du",
      "level": "intermediate",
      "examples": [{{"en": "This is an example.", "vi": "Day la mot vi du."}}]
    }}
  ],
  "word_forms": {{"plural": "examples"}},
  "synonyms": ["instance"]
}}
{delim} Response:
"#,
        delim = DELIMITER,
        word = word
    )
}

fn build_translation_prompt(text: &str, source: &str, target: &str) -> String {
    format!(
        "{delim} Instruction:\nTranslate the following {source} text into {target}. \
         Respond with the translation only.\n\n{text}\n{delim} Response:\n",
        delim = DELIMITER,
        source = source,
        target = target,
        text = text
    )
}

/// Extract the JSON object embedded in a free-text completion
///
/// Takes the substring from the first `{` to the last `}`; returns None
/// when no such window exists.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extract and validate a generated entry from raw completion text
fn parse_generated_entry(text: &str) -> Result<GeneratedEntry, CompletionError> {
    let json = extract_json(text).ok_or_else(|| {
        CompletionError::Unparsable("no JSON object found in completion".to_string())
    })?;

    let entry: GeneratedEntry = serde_json::from_str(json)
        .map_err(|e| CompletionError::Unparsable(format!("schema mismatch: {}", e)))?;

    if entry.definitions.is_empty() {
        return Err(CompletionError::Unparsable(
            "generated entry has no definitions".to_string(),
        ));
    }

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ENTRY_JSON: &str = r#"{
        "word": "serendipity",
        "pronunciations": [{"accent": "US", "ipa": "/serendipity/"}],
        "definitions": [{
            "pos": "noun",
            "definition_en": "finding good things by chance",
            "definition_vi": "tinh co may man",
            "level": "advanced",
            "examples": [{"en": "Pure serendipity.", "vi": "Hoan toan tinh co."}]
        }],
        "word_forms": {"plural": "serendipities"},
        "synonyms": ["luck"]
    }"#;

    #[test]
    fn test_extract_json_tolerates_surrounding_prose() {
        let completion = format!("Sure, here:\n{}\nHope that helps", VALID_ENTRY_JSON);
        let extracted = extract_json(&completion).unwrap();
        assert!(extracted.starts_with('{'));
        assert!(extracted.ends_with('}'));

        let entry = parse_generated_entry(&completion).unwrap();
        assert_eq!(entry.word, "serendipity");
        assert_eq!(entry.definitions.len(), 1);
        assert_eq!(entry.definitions[0].level, Level::Advanced);
    }

    #[test]
    fn test_extract_json_handles_nested_braces() {
        let completion = r#"Answer: {"word": "x", "definitions": [{"pos": "noun",
            "definition_en": "a", "definition_vi": "b"}], "word_forms": {"plural": "xs"}}"#;
        let entry = parse_generated_entry(completion).unwrap();
        assert_eq!(entry.word_forms.get("plural").map(String::as_str), Some("xs"));
    }

    #[test]
    fn test_parse_fails_without_braces() {
        let err = parse_generated_entry("I cannot produce an entry for that word.").unwrap_err();
        assert!(matches!(err, CompletionError::Unparsable(_)));
    }

    #[test]
    fn test_parse_rejects_empty_definitions() {
        let err = parse_generated_entry(r#"{"word": "x", "definitions": []}"#).unwrap_err();
        assert!(matches!(err, CompletionError::Unparsable(_)));
    }

    #[test]
    fn test_parse_rejects_schema_mismatch() {
        // definitions entries missing required fields
        let err = parse_generated_entry(r#"{"word": "x", "definitions": [{"pos": "noun"}]}"#)
            .unwrap_err();
        assert!(matches!(err, CompletionError::Unparsable(_)));
    }

    #[test]
    fn test_into_word_entry_fills_missing_word() {
        let entry: GeneratedEntry = serde_json::from_str(
            r#"{"definitions": [{"pos": "noun", "definition_en": "a", "definition_vi": "b"}]}"#,
        )
        .unwrap();

        let word_entry = entry.into_word_entry("hello");
        assert_eq!(word_entry.word, "hello");
        assert!(word_entry.word_forms.is_none());
        assert!(word_entry.synonyms.is_none());
    }

    #[test]
    fn test_language_name_table_with_code_fallback() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("vi"), "Vietnamese");
        assert_eq!(language_name("xx"), "xx");
    }

    #[test]
    fn test_entry_prompt_embeds_word_and_delimiter() {
        let prompt = build_entry_prompt("hello");
        assert!(prompt.contains("\"hello\""));
        assert!(prompt.contains(DELIMITER));
        assert!(prompt.contains("definition_vi"));
    }
}
