//! In-memory key-value store
//!
//! Used by tests and by sessions started with `--ephemeral`. Clones share the
//! same backing map, so a test can hand one clone to the playlist store and
//! inspect what was persisted through another.

use crate::error::StorageError;
use resona_core::{KeyValueStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, Value>,
    writes: usize,
    read_only: bool,
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with values
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let store = Self::new();
        store.lock().values = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        store
    }

    /// Current value for `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().values.get(key).cloned()
    }

    /// Number of successful `save` calls since creation
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Make subsequent writes fail with `StorageError::ReadOnly`
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the map half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: Value) -> Result<()> {
        let mut inner = self.lock();
        if inner.read_only {
            return Err(StorageError::ReadOnly.into());
        }
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let mut handle = store.clone();

        handle.save("playlists", json!([])).unwrap();

        assert_eq!(store.get("playlists"), Some(json!([])));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn missing_key_loads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut store = MemoryStore::with_values([("currentPlaylistIndex", json!(0))]);
        store.set_read_only(true);

        assert!(store.save("currentPlaylistIndex", json!(1)).is_err());
        assert_eq!(store.get("currentPlaylistIndex"), Some(json!(0)));
        assert_eq!(store.write_count(), 0);
    }
}
