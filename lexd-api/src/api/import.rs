//! Administrative import endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::error::ApiResult;
use crate::models::{ImportPayload, ImportResponse};
use crate::AppState;

/// POST /words/import
///
/// Idempotently fold one externally sourced entry into the store.
pub async fn import_word(
    State(state): State<AppState>,
    Json(payload): Json<ImportPayload>,
) -> ApiResult<Json<ImportResponse>> {
    let word = state.importer.import_entry(payload).await?;

    Ok(Json(ImportResponse {
        success: true,
        word,
    }))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new().route("/words/import", post(import_word))
}
