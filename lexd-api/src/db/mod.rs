//! Database access for lexd-api
//!
//! One module per table, each a set of row structs and free async
//! functions over the shared pool. Schema lives in
//! `lexd_common::db::init`.

pub mod definitions;
pub mod entries;
pub mod pronunciations;
pub mod synonyms;
pub mod word_forms;
