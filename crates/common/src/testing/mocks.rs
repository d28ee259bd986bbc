//! Mock implementations of common traits

// Allow missing error/panic docs for test mocks - they are designed to be simple
#![allow(clippy::missing_errors_doc)]

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::storage::TokenStore;

/// Operation recorded by [`RecordingTokenStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Set(String, String),
    Remove(String),
    Clear,
}

/// In-memory token store that records every mutation.
#[derive(Debug, Default)]
pub struct RecordingTokenStore {
    entries: Mutex<HashMap<String, String>>,
    ops: Mutex<Vec<StoreOp>>,
}

impl RecordingTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`, without recording them.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        store
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn clear_ops(&self) {
        self.ops.lock().clear();
    }
}

impl TokenStore for RecordingTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
        self.ops.lock().push(StoreOp::Set(key.to_string(), value.to_string()));
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
        self.ops.lock().push(StoreOp::Remove(key.to_string()));
    }

    fn clear(&self) {
        self.entries.lock().clear();
        self.ops.lock().push(StoreOp::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_mutations_in_order() {
        let store = RecordingTokenStore::with_entries([("a", "1")]);
        store.set("b", "2");
        store.remove("a");

        assert_eq!(store.keys(), vec!["b".to_string()]);
        assert_eq!(
            store.ops(),
            vec![StoreOp::Set("b".into(), "2".into()), StoreOp::Remove("a".into())]
        );

        store.clear();
        assert!(!store.contains("b"));
        assert_eq!(store.ops().last(), Some(&StoreOp::Clear));
    }
}
