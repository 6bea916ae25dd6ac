//! JSON file-based snapshot store implementation

use std::collections::BTreeMap;
use std::path::Path;

use super::error::{StorageError, StorageResult};
use super::traits::SnapshotStore;

/// JSON file-based snapshot store
///
/// All keys live in one JSON object on disk. Writes are buffered until
/// [`flush`](SnapshotStore::flush) or drop.
pub struct JsonFileStore {
    path: std::path::PathBuf,
    entries: BTreeMap<String, serde_json::Value>,
    dirty: bool,
}

impl JsonFileStore {
    /// Create or open a JSON file store
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries, dirty: false })
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn put(&mut self, key: &str, value: serde_json::Value) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        let removed = self.entries.remove(key).is_some();
        self.dirty |= removed;
        Ok(removed)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn flush(&mut self) -> StorageResult<()> {
        if self.dirty {
            let json = serde_json::to_string_pretty(&self.entries)?;
            std::fs::write(&self.path, json)?;
            self.dirty = false;
        }
        Ok(())
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
