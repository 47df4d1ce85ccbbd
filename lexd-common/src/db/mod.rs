//! Database access shared across the lexd service

pub mod init;

pub use init::{create_tables, init_database_pool};
