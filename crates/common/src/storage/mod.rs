//! Token storage
//!
//! Durable key/value persistence for session tokens. Every implementation is
//! infallible from the caller's point of view: when the persistent medium is
//! missing or broken the store keeps working in memory, so session logic is
//! identical in every environment.
//!
//! # Module Organization
//!
//! - **[`memory`]**: in-process map, always available
//! - **`keychain`** (feature `platform`): platform keychain via `keyring`,
//!   with an in-memory shadow
//! - [`detect_token_store`]: picks the best available store

pub mod memory;

#[cfg(feature = "platform")]
pub mod keychain;

use std::sync::Arc;

#[cfg(feature = "platform")]
pub use keychain::KeychainTokenStore;
pub use memory::MemoryTokenStore;

/// Synchronous key/value store for session tokens.
///
/// Implementations must never panic and must not surface storage failures;
/// degrade to in-memory behaviour instead.
pub trait TokenStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove `key` (idempotent).
    fn remove(&self, key: &str);

    /// Remove every key this store holds.
    fn clear(&self);
}

/// Pick the best available token store for `service`.
///
/// With the `platform` feature the OS keychain is probed with a
/// write/read/delete round-trip; `known_keys` seeds the keys `clear()` must
/// remove even if they were written by an earlier process. Without a usable
/// keychain (or without the feature) an in-memory store is returned.
#[allow(unused_variables)]
pub fn detect_token_store<I, S>(service: &str, known_keys: I) -> Arc<dyn TokenStore>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    #[cfg(feature = "platform")]
    {
        if KeychainTokenStore::probe(service) {
            tracing::debug!(service = %service, "Using keychain token store");
            return Arc::new(KeychainTokenStore::new(service).with_known_keys(known_keys));
        }
        tracing::warn!(
            service = %service,
            "Keychain unavailable, falling back to in-memory token store"
        );
    }

    Arc::new(MemoryTokenStore::new())
}
