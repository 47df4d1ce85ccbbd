//! Free-text translation endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::models::{TranslateRequest, TranslateResponse};
use crate::AppState;

/// POST /translate
///
/// One-shot translation through the completion client; the trimmed
/// completion text is the translation.
pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let translation = state
        .translator
        .translate(&request.text, &request.source_lang, &request.target_lang)
        .await?;

    Ok(Json(TranslateResponse { translation }))
}

/// Build translation routes
pub fn translate_routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate))
}
