//! Phonetic-data API client and accent classification
//!
//! Resolves pronunciation audio URLs for a word, bucketed by accent.
//! Audio is best-effort enrichment: every failure degrades to "no
//! audio" and never fails a lookup.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const PHONETIC_TIMEOUT: Duration = Duration::from_secs(10);

/// Accent bucket for a pronunciation or audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Us,
    Uk,
}

impl Accent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::Us => "US",
            Accent::Uk => "UK",
        }
    }

    /// Parse a stored accent tag. Tags are free-form; anything that is
    /// not recognizably British maps to the US bucket, which falls back
    /// to UK during resolution anyway.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "UK" | "GB" | "BRITISH" => Accent::Uk,
            _ => Accent::Us,
        }
    }
}

/// Phonetic API errors (absorbed before they reach callers)
#[derive(Debug, Error)]
enum AudioError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}")]
    Api(u16),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Phonetic API response entry
#[derive(Debug, Deserialize)]
struct PhoneticEntry {
    #[serde(default)]
    #[allow(dead_code)]
    word: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    #[allow(dead_code)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

/// Audio URLs classified by accent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuckets {
    pub us: Option<String>,
    pub uk: Option<String>,
}

impl AudioBuckets {
    /// Resolve for an accent, preferring its own bucket and falling back
    /// to the other (many accents share recordings, or the API omits
    /// one accent)
    pub fn for_accent(&self, accent: Accent) -> Option<&str> {
        match accent {
            Accent::Us => self.us.as_deref().or(self.uk.as_deref()),
            Accent::Uk => self.uk.as_deref().or(self.us.as_deref()),
        }
    }
}

/// Classify audio URLs into accent buckets by substring matching.
///
/// A URL matching neither pattern is defaulted into the US bucket only
/// while both buckets are still empty.
pub fn classify_audio_urls<'a>(urls: impl IntoIterator<Item = &'a str>) -> AudioBuckets {
    let mut buckets = AudioBuckets::default();

    for url in urls {
        if url.is_empty() {
            continue;
        }

        if url.contains("-us.mp3") || url.contains("/us/") {
            if buckets.us.is_none() {
                buckets.us = Some(url.to_string());
            }
        } else if url.contains("-uk.mp3") || url.contains("/uk/") {
            if buckets.uk.is_none() {
                buckets.uk = Some(url.to_string());
            }
        } else if buckets.us.is_none() && buckets.uk.is_none() {
            buckets.us = Some(url.to_string());
        }
    }

    buckets
}

/// Resolves pronunciation audio for a word and accent
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn resolve(&self, word: &str, accent: Accent) -> Option<String>;
}

/// Phonetic-data API client
pub struct AudioResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl AudioResolver {
    pub fn new(base_url: String) -> lexd_common::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(PHONETIC_TIMEOUT)
            .build()
            .map_err(|e| lexd_common::Error::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    async fn fetch_buckets(&self, word: &str) -> Result<AudioBuckets, AudioError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), word);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AudioError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Api(status.as_u16()));
        }

        let entries: Vec<PhoneticEntry> = response
            .json()
            .await
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        let urls = entries
            .iter()
            .flat_map(|entry| entry.phonetics.iter())
            .filter_map(|phonetic| phonetic.audio.as_deref());

        Ok(classify_audio_urls(urls))
    }

    /// Resolve an audio URL for a word and accent; failures degrade to
    /// None
    pub async fn resolve_audio(&self, word: &str, accent: Accent) -> Option<String> {
        match self.fetch_buckets(word).await {
            Ok(buckets) => buckets.for_accent(accent).map(str::to_string),
            Err(e) => {
                tracing::debug!(
                    word = %word,
                    accent = accent.as_str(),
                    error = %e,
                    "Audio lookup failed; continuing without audio"
                );
                None
            }
        }
    }
}

#[async_trait]
impl AudioSource for AudioResolver {
    async fn resolve(&self, word: &str, accent: Accent) -> Option<String> {
        self.resolve_audio(word, accent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_substring() {
        let buckets = classify_audio_urls([
            "https://audio.example/hello-uk.mp3",
            "https://audio.example/hello-us.mp3",
        ]);

        assert_eq!(buckets.us.as_deref(), Some("https://audio.example/hello-us.mp3"));
        assert_eq!(buckets.uk.as_deref(), Some("https://audio.example/hello-uk.mp3"));
    }

    #[test]
    fn test_classify_path_segment_patterns() {
        let buckets = classify_audio_urls([
            "https://cdn.example/us/hello.ogg",
            "https://cdn.example/uk/hello.ogg",
        ]);

        assert_eq!(buckets.us.as_deref(), Some("https://cdn.example/us/hello.ogg"));
        assert_eq!(buckets.uk.as_deref(), Some("https://cdn.example/uk/hello.ogg"));
    }

    #[test]
    fn test_unmatched_url_defaults_to_us_only_when_empty() {
        let buckets = classify_audio_urls(["https://audio.example/hello.mp3"]);
        assert_eq!(buckets.us.as_deref(), Some("https://audio.example/hello.mp3"));
        assert!(buckets.uk.is_none());

        // Once an accent is known, unmatched URLs are not defaulted
        let buckets = classify_audio_urls([
            "https://audio.example/hello-uk.mp3",
            "https://audio.example/hello.mp3",
        ]);
        assert!(buckets.us.is_none());
        assert_eq!(buckets.uk.as_deref(), Some("https://audio.example/hello-uk.mp3"));
    }

    #[test]
    fn test_empty_urls_skipped() {
        let buckets = classify_audio_urls(["", "https://audio.example/hello-us.mp3"]);
        assert_eq!(buckets.us.as_deref(), Some("https://audio.example/hello-us.mp3"));
    }

    #[test]
    fn test_accent_fallback_both_directions() {
        let uk_only = AudioBuckets {
            us: None,
            uk: Some("url-uk".to_string()),
        };
        assert_eq!(uk_only.for_accent(Accent::Us), Some("url-uk"));
        assert_eq!(uk_only.for_accent(Accent::Uk), Some("url-uk"));

        let us_only = AudioBuckets {
            us: Some("url-us".to_string()),
            uk: None,
        };
        assert_eq!(us_only.for_accent(Accent::Uk), Some("url-us"));

        let empty = AudioBuckets::default();
        assert_eq!(empty.for_accent(Accent::Us), None);
    }

    #[test]
    fn test_accent_tag_parsing() {
        assert_eq!(Accent::from_tag("US"), Accent::Us);
        assert_eq!(Accent::from_tag("uk"), Accent::Uk);
        assert_eq!(Accent::from_tag(" GB "), Accent::Uk);
        assert_eq!(Accent::from_tag("australian"), Accent::Us);
    }
}
