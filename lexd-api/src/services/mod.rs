//! Service layer for lexd-api
//!
//! External-API clients, the import merger, and the lookup orchestrator.

pub mod audio_resolver;
pub mod completion_client;
pub mod import_merger;
pub mod lookup;

pub use audio_resolver::{Accent, AudioResolver, AudioSource};
pub use completion_client::{CompletionClient, EntryGenerator, GeneratedEntry, Translator};
pub use import_merger::ImportMerger;
pub use lookup::LookupOrchestrator;
