//! In-process token store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::TokenStore;

/// Token store backed by a map that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get("missing"), None);

        store.set("rt", "refresh");
        assert_eq!(store.get("rt").as_deref(), Some("refresh"));

        store.set("rt", "rotated");
        assert_eq!(store.get("rt").as_deref(), Some("rotated"));

        store.remove("rt");
        store.remove("rt");
        assert_eq!(store.get("rt"), None);
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryTokenStore::new();
        store.set("a", "1");
        store.set("b", "2");
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
