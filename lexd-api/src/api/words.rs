//! Word lookup and search endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::entries;
use crate::error::ApiResult;
use crate::models::{SearchResponse, WordEntry};
use crate::AppState;

const SEARCH_LIMIT: i64 = 10;

/// Static fallback suggestions for an empty store
const FALLBACK_WORDS: &[&str] = &[
    "about", "after", "again", "because", "before", "could", "different", "every", "first",
    "great", "hello", "house", "know", "learn", "little", "people", "right", "school", "think",
    "water", "world", "would", "write", "yellow", "young",
];

/// GET /words/:word
///
/// Resolve a word to its assembled dictionary entry, via the store or
/// the generative fallback.
pub async fn lookup_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Json<WordEntry>> {
    let entry = state.lookup.lookup(&word).await?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
}

/// GET /words/search?q=prefix
///
/// Prefix match against stored normalized words, with a static word
/// list fallback when the store yields nothing.
pub async fn search_words(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let prefix = params.q.trim().to_lowercase();
    if prefix.is_empty() {
        return Ok(Json(SearchResponse { words: vec![] }));
    }

    let mut words = entries::search_prefix(&state.db, &prefix, SEARCH_LIMIT).await?;

    if words.is_empty() {
        words = FALLBACK_WORDS
            .iter()
            .filter(|word| word.starts_with(&prefix))
            .take(SEARCH_LIMIT as usize)
            .map(|word| word.to_string())
            .collect();
    }

    Ok(Json(SearchResponse { words }))
}

/// Build word routes
pub fn words_routes() -> Router<AppState> {
    Router::new()
        .route("/words/search", get(search_words))
        .route("/words/:word", get(lookup_word))
}
