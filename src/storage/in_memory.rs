//! In-memory snapshot store implementation

use std::collections::BTreeMap;

use super::error::StorageResult;
use super::traits::SnapshotStore;

/// In-memory snapshot store
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    pub(crate) entries: BTreeMap<String, serde_json::Value>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no snapshots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for InMemoryStore {
    fn put(&mut self, key: &str, value: serde_json::Value) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }
}
