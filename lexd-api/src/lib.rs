//! lexd-api library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::audio_resolver::AudioSource;
use crate::services::completion_client::{EntryGenerator, Translator};
use crate::services::import_merger::ImportMerger;
use crate::services::lookup::LookupOrchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Lookup orchestrator (store → audio enrichment → generative fallback)
    pub lookup: Arc<LookupOrchestrator>,
    /// Import merger for the administrative path
    pub importer: Arc<ImportMerger>,
    /// Free-text translation provider
    pub translator: Arc<dyn Translator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        generator: Arc<dyn EntryGenerator>,
        audio: Arc<dyn AudioSource>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let lookup = Arc::new(LookupOrchestrator::new(db.clone(), generator, audio));
        let importer = Arc::new(ImportMerger::new(db.clone()));

        Self {
            db,
            lookup,
            importer,
            translator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::words_routes())
        .merge(api::import_routes())
        .merge(api::translate_routes())
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
