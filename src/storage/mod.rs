//! Snapshot Storage Module
//!
//! Keyed persistence for JSON snapshots. The in-memory store backs tests and
//! embedding; the JSON file store keeps every key in one pretty-printed file.

mod error;
mod in_memory;
mod json_file;
mod traits;

pub use error::{StorageError, StorageResult};
pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use traits::SnapshotStore;
