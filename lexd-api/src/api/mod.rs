//! HTTP API handlers for lexd-api

pub mod health;
pub mod import;
pub mod translate;
pub mod words;

pub use health::health_routes;
pub use import::import_routes;
pub use translate::translate_routes;
pub use words::words_routes;
