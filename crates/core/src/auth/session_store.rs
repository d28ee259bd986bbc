//! Typed session view over a token store
//!
//! Each session field lives under its own namespaced key
//! (`<namespace>.<field>`), so a store written by an earlier process is
//! picked up as-is.

use std::sync::Arc;

use stitch_common::storage::TokenStore;
use stitch_domain::constants::{
    ACCESS_TOKEN_KEY, AUTH_ERROR_KEY, DEVICE_ID_KEY, EMPTY_DEVICE_ID, IMPERSONATION_ACTIVE_KEY,
    IMPERSONATION_REAL_SESSION_KEY, IMPERSONATION_USER_KEY, REFRESH_TOKEN_KEY,
    SESSION_STORAGE_KEYS, STATE_KEY, USER_ID_KEY,
};
use stitch_domain::{Result, Session, StitchError};
use tracing::debug;

const ACTIVE_FLAG: &str = "true";

/// Session, auth error, OAuth state and impersonation snapshot persisted in a
/// [`TokenStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn TokenStore>,
    namespace: String,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TokenStore>, namespace: impl Into<String>) -> Self {
        Self { store, namespace: namespace.into() }
    }

    /// Fully qualified store key for `field`.
    pub fn key(&self, field: &str) -> String {
        format!("{}.{}", self.namespace, field)
    }

    /// Every fully qualified key this store may write.
    pub fn known_keys(&self) -> Vec<String> {
        SESSION_STORAGE_KEYS.iter().map(|field| self.key(field)).collect()
    }

    fn get(&self, field: &str) -> Option<String> {
        self.store.get(&self.key(field)).filter(|value| !value.is_empty())
    }

    fn set(&self, field: &str, value: &str) {
        self.store.set(&self.key(field), value);
    }

    fn set_or_remove(&self, field: &str, value: Option<&str>) {
        match value {
            Some(value) => self.set(field, value),
            None => self.remove(field),
        }
    }

    fn remove(&self, field: &str) {
        self.store.remove(&self.key(field));
    }

    // Session
    // -----------------------------------------------------------------

    pub fn session(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user_id: self.user_id(),
            device_id: self.device_id(),
        }
    }

    pub fn has_session(&self) -> bool {
        self.session().is_active()
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    pub fn user_id(&self) -> Option<String> {
        self.get(USER_ID_KEY)
    }

    pub fn device_id(&self) -> Option<String> {
        self.get(DEVICE_ID_KEY)
    }

    /// Replace the stored session.
    ///
    /// Tokens and user id absent from `session` are removed. The device id is
    /// only ever overwritten by a real one.
    pub fn store_session(&self, session: &Session) {
        self.set_or_remove(ACCESS_TOKEN_KEY, session.access_token.as_deref());
        self.set_or_remove(REFRESH_TOKEN_KEY, session.refresh_token.as_deref());
        self.set_or_remove(USER_ID_KEY, session.user_id.as_deref());
        if let Some(device_id) = session.device_id.as_deref() {
            self.store_device_id(device_id);
        }
    }

    pub fn set_access_token(&self, token: &str) {
        self.set(ACCESS_TOKEN_KEY, token);
    }

    /// Persist a server-assigned device id, ignoring the all-zero sentinel.
    pub fn store_device_id(&self, device_id: &str) {
        if device_id.is_empty() || device_id == EMPTY_DEVICE_ID {
            return;
        }
        self.set(DEVICE_ID_KEY, device_id);
    }

    /// Forget tokens, user id and any impersonation. The device id survives.
    pub fn clear(&self) {
        for field in [
            ACCESS_TOKEN_KEY,
            REFRESH_TOKEN_KEY,
            USER_ID_KEY,
            IMPERSONATION_ACTIVE_KEY,
            IMPERSONATION_USER_KEY,
            IMPERSONATION_REAL_SESSION_KEY,
        ] {
            self.remove(field);
        }
        debug!(namespace = %self.namespace, "Cleared stored session");
    }

    // Auth error and OAuth state
    // -----------------------------------------------------------------

    pub fn auth_error(&self) -> Option<String> {
        self.get(AUTH_ERROR_KEY)
    }

    pub fn set_auth_error(&self, error: &str) {
        self.set(AUTH_ERROR_KEY, error);
    }

    pub fn clear_auth_error(&self) {
        self.remove(AUTH_ERROR_KEY);
    }

    pub fn oauth_state(&self) -> Option<String> {
        self.get(STATE_KEY)
    }

    pub fn set_oauth_state(&self, state: &str) {
        self.set(STATE_KEY, state);
    }

    pub fn clear_oauth_state(&self) {
        self.remove(STATE_KEY);
    }

    // Impersonation
    // -----------------------------------------------------------------

    pub fn is_impersonating(&self) -> bool {
        self.get(IMPERSONATION_ACTIVE_KEY).as_deref() == Some(ACTIVE_FLAG)
    }

    pub fn impersonated_user_id(&self) -> Option<String> {
        self.get(IMPERSONATION_USER_KEY)
    }

    /// Session that was active before impersonation started.
    pub fn real_session(&self) -> Result<Option<Session>> {
        self.get(IMPERSONATION_REAL_SESSION_KEY)
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| {
                    StitchError::Storage(format!("corrupt impersonation snapshot: {e}"))
                })
            })
            .transpose()
    }

    /// Snapshot the current session and mark `user_id` as impersonated.
    pub fn begin_impersonation(&self, user_id: &str) -> Result<()> {
        let snapshot = serde_json::to_string(&self.session())
            .map_err(|e| StitchError::Storage(format!("cannot snapshot session: {e}")))?;
        self.set(IMPERSONATION_REAL_SESSION_KEY, &snapshot);
        self.set(IMPERSONATION_USER_KEY, user_id);
        self.set(IMPERSONATION_ACTIVE_KEY, ACTIVE_FLAG);
        Ok(())
    }

    /// Restore the snapshot taken by [`Self::begin_impersonation`] and drop
    /// the impersonation keys.
    pub fn end_impersonation(&self) -> Result<()> {
        let real = self.real_session()?;
        self.remove(IMPERSONATION_ACTIVE_KEY);
        self.remove(IMPERSONATION_USER_KEY);
        self.remove(IMPERSONATION_REAL_SESSION_KEY);
        if let Some(real) = real {
            self.store_session(&real);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}
