//! Common error types for lexd

use thiserror::Error;

/// Common result type for lexd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the lexd service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External call exceeded its deadline
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// No usable JSON object found in a completion response
    #[error("Generation unparsable: {0}")]
    GenerationUnparsable(String),

    /// An import step failed after prior steps already committed
    #[error("Import failed for '{word}': {reason}")]
    ImportFailed { word: String, reason: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
