//! LocalStorage - Device-local string key/value storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::StoreError;

/// Device-local persistent storage with string keys and string values,
/// shaped after the browser's `localStorage`.
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under `key`. Returns None if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory local storage backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same entries.
#[derive(Clone, Default)]
pub struct InMemoryLocalStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for InMemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let storage = InMemoryLocalStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn get_missing_returns_none() {
        let storage = InMemoryLocalStorage::new();
        assert_eq!(storage.get_item("missing").unwrap(), None);
    }

    #[test]
    fn remove_missing_is_ok() {
        let storage = InMemoryLocalStorage::new();
        storage.remove_item("missing").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn clone_shares_storage() {
        let storage = InMemoryLocalStorage::new();
        let clone = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(clone.get_item("k").unwrap(), Some("v".to_string()));

        clone.remove_item("k").unwrap();
        assert_eq!(storage.len(), 0);
    }
}
