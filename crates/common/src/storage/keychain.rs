//! Keychain-backed token store
//!
//! Persists tokens in the platform keychain (macOS Keychain Access, Windows
//! Credential Manager, Linux Secret Service) through the `keyring` crate.
//!
//! Keychain failures never reach the caller. Every value is mirrored in an
//! in-memory shadow, so a locked or missing keychain degrades to per-process
//! storage and reads stay consistent with writes.

use std::collections::{HashMap, HashSet};

use keyring::Entry;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::TokenStore;

const PROBE_KEY: &str = "__stitch_probe";

/// Token store backed by the platform keychain
pub struct KeychainTokenStore {
    service_name: String,
    shadow: RwLock<HashMap<String, String>>,
    known_keys: RwLock<HashSet<String>>,
}

impl KeychainTokenStore {
    /// Create a store whose entries live under `service_name`
    /// (e.g. `"Stitch.testapp"`).
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            shadow: RwLock::new(HashMap::new()),
            known_keys: RwLock::new(HashSet::new()),
        }
    }

    /// Keys `clear()` removes even when this process never wrote them.
    #[must_use]
    pub fn with_known_keys<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_keys.write().extend(keys.into_iter().map(Into::into));
        self
    }

    /// Whether the keychain accepts a write/read/delete round-trip.
    pub fn probe(service_name: &str) -> bool {
        let Ok(entry) = Entry::new(service_name, PROBE_KEY) else {
            return false;
        };
        if entry.set_password("probe").is_err() {
            return false;
        }
        let readable = matches!(entry.get_password().as_deref(), Ok("probe"));
        let _ = entry.delete_credential();
        readable
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, key: &str) -> Option<Entry> {
        match Entry::new(&self.service_name, key) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(service = %self.service_name, key = %key, error = %e, "Invalid keychain entry");
                None
            }
        }
    }

    fn delete_persisted(&self, key: &str) {
        let Some(entry) = self.entry(key) else {
            return;
        };
        if let Err(e) = entry.delete_credential() {
            if !matches!(e, keyring::Error::NoEntry) {
                warn!(service = %self.service_name, key = %key, error = %e, "Failed to delete keychain entry");
            }
        }
    }
}

impl TokenStore for KeychainTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.shadow.read().get(key) {
            return Some(value.clone());
        }

        let entry = self.entry(key)?;
        match entry.get_password() {
            Ok(value) => {
                debug!(service = %self.service_name, key = %key, "Loaded token from keychain");
                self.shadow.write().insert(key.to_string(), value.clone());
                Some(value)
            }
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(service = %self.service_name, key = %key, error = %e, "Keychain read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(entry) = self.entry(key) {
            if let Err(e) = entry.set_password(value) {
                warn!(
                    service = %self.service_name,
                    key = %key,
                    error = %e,
                    "Keychain write failed, keeping value in memory only"
                );
            }
        }
        self.known_keys.write().insert(key.to_string());
        self.shadow.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.delete_persisted(key);
        self.shadow.write().remove(key);
    }

    fn clear(&self) {
        let mut keys: HashSet<String> = self.known_keys.read().clone();
        keys.extend(self.shadow.read().keys().cloned());

        for key in &keys {
            self.delete_persisted(key);
        }
        self.shadow.write().clear();
        debug!(service = %self.service_name, removed = keys.len(), "Cleared keychain token store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> KeychainTokenStore {
        KeychainTokenStore::new(format!("StitchTest.keychain.{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn reads_follow_writes_even_without_keychain() {
        let store = test_store();
        store.set("_stitch.rt", "refresh-token");
        assert_eq!(store.get("_stitch.rt").as_deref(), Some("refresh-token"));

        store.remove("_stitch.rt");
        assert_eq!(store.get("_stitch.rt"), None);
    }

    #[test]
    fn clear_removes_written_keys() {
        let store = test_store().with_known_keys(["_stitch.did"]);
        store.set("_stitch.at", "access");
        store.set("_stitch.uid", "user");

        store.clear();

        assert_eq!(store.get("_stitch.at"), None);
        assert_eq!(store.get("_stitch.uid"), None);
    }
}
