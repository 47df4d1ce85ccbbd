//! lexd-api - Dictionary Lookup Service
//!
//! Resolves words against the persistent entry store with a generative
//! fallback for misses, lazily enriches pronunciation audio, and
//! accepts administrative bulk imports.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use lexd_common::config::ServiceConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lexd_api::services::{AudioResolver, CompletionClient};
use lexd_api::AppState;

#[derive(Debug, Parser)]
#[command(name = "lexd-api", about = "Dictionary lookup service")]
struct Args {
    /// Address to bind, e.g. 127.0.0.1:5760
    #[arg(long)]
    bind: Option<String>,

    /// Path to the SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting lexd-api (Dictionary Lookup) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::resolve(
        args.bind.as_deref(),
        args.database.as_deref(),
        args.config.as_deref(),
    )?;

    info!("Database: {}", config.database_path.display());
    let db_pool = lexd_common::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let completion_client = Arc::new(
        CompletionClient::new(config.completion.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create completion client: {}", e))?,
    );
    let audio_resolver = Arc::new(
        AudioResolver::new(config.phonetic_base_url.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create audio resolver: {}", e))?,
    );

    let state = AppState::new(
        db_pool,
        completion_client.clone(),
        audio_resolver,
        completion_client,
    );

    let app = lexd_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
