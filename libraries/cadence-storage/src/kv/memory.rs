//! In-memory key-value store

use cadence_core::{KeyValueStore, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Volatile store, used for tests and unauthenticated throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("user").unwrap().is_none());

        store.set("user", "alice").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("alice"));

        store.set("user", "bob").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("bob"));
        assert_eq!(store.len(), 1);

        store.remove("user").unwrap();
        assert!(store.is_empty());

        // Removing twice is fine
        store.remove("user").unwrap();
    }
}
