//! Snapshot storage trait definitions

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{StorageError, StorageResult};

/// Keyed snapshot storage backend
pub trait SnapshotStore: Send + Sync {
    /// Store a JSON document under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: serde_json::Value) -> StorageResult<()>;

    /// Fetch the JSON document stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<serde_json::Value>>;

    /// Remove `key`, returning whether it was present
    fn remove(&mut self, key: &str) -> StorageResult<bool>;

    /// All stored keys, sorted
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Flush pending writes
    fn flush(&mut self) -> StorageResult<()>;

    /// Serialize `value` and store it under `key`
    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> StorageResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_value(value)?;
        self.put(key, json)
    }

    /// Load and deserialize the value stored under `key`
    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<T>
    where
        Self: Sized,
    {
        let json = self.get(key)?.ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(serde_json::from_value(json)?)
    }
}
