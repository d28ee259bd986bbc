//! Authentication state machine

use super::session_store::SessionStore;

/// Where the client stands with the server.
///
/// Derived from the stored session on every read, so it can never drift from
/// what is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
    /// Logged in as an admin acting as another user.
    Impersonating,
}

impl AuthState {
    pub fn current(store: &SessionStore) -> Self {
        if !store.has_session() {
            Self::LoggedOut
        } else if store.is_impersonating() {
            Self::Impersonating
        } else {
            Self::LoggedIn
        }
    }

    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::LoggedOut)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stitch_common::storage::MemoryTokenStore;
    use stitch_domain::Session;

    use super::*;

    #[test]
    fn transitions_follow_store() {
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()), "_stitch");
        assert_eq!(AuthState::current(&store), AuthState::LoggedOut);

        store.store_session(&Session { user_id: Some("u".into()), ..Session::default() });
        assert_eq!(AuthState::current(&store), AuthState::LoggedIn);

        store.begin_impersonation("other").unwrap();
        assert_eq!(AuthState::current(&store), AuthState::Impersonating);
        assert!(AuthState::current(&store).is_authenticated());

        store.clear();
        assert_eq!(AuthState::current(&store), AuthState::LoggedOut);
    }
}
