//! Integration tests for the session store and state machine
//!
//! Drives a full logged-out → logged-in → impersonating → logged-out cycle
//! through a recording token store and checks what was persisted.

use std::sync::Arc;

use stitch_common::testing::{init_test_tracing, RecordingTokenStore, StoreOp};
use stitch_core::{AuthState, SessionStore};
use stitch_domain::Session;

fn admin_session() -> Session {
    Session {
        access_token: Some("admin-at".into()),
        refresh_token: Some("admin-rt".into()),
        user_id: Some("admin".into()),
        device_id: Some("5899445b275d3ebe8f2ab8c1".into()),
    }
}

#[test]
fn test_full_session_lifecycle() {
    init_test_tracing();

    let backing = Arc::new(RecordingTokenStore::new());
    let store = SessionStore::new(backing.clone(), "_stitch");
    assert_eq!(AuthState::current(&store), AuthState::LoggedOut);

    store.store_session(&admin_session());
    assert_eq!(AuthState::current(&store), AuthState::LoggedIn);

    store.begin_impersonation("target").unwrap();
    store.store_session(&Session {
        access_token: Some("target-at".into()),
        refresh_token: store.refresh_token(),
        user_id: Some("target".into()),
        device_id: None,
    });
    assert_eq!(AuthState::current(&store), AuthState::Impersonating);
    assert_eq!(store.real_session().unwrap(), Some(admin_session()));

    store.end_impersonation().unwrap();
    assert_eq!(AuthState::current(&store), AuthState::LoggedIn);
    assert_eq!(store.session(), admin_session());

    backing.clear_ops();
    store.clear();
    assert_eq!(AuthState::current(&store), AuthState::LoggedOut);
    assert!(backing.ops().iter().all(|op| matches!(op, StoreOp::Remove(_))));
    assert!(backing.contains("_stitch.did"));
}

/// A second store over the same backing sees what the first persisted.
#[test]
fn test_session_survives_restart() {
    let backing = Arc::new(RecordingTokenStore::new());
    SessionStore::new(backing.clone(), "_stitch").store_session(&admin_session());

    let reopened = SessionStore::new(backing, "_stitch");
    assert_eq!(reopened.session(), admin_session());
    assert_eq!(AuthState::current(&reopened), AuthState::LoggedIn);
}

/// Namespaces isolate clients sharing one backing store.
#[test]
fn test_namespaces_are_isolated() {
    let backing = Arc::new(RecordingTokenStore::new());
    let first = SessionStore::new(backing.clone(), "_stitch.app1");
    let second = SessionStore::new(backing, "_stitch.app2");

    first.store_session(&admin_session());
    assert!(!second.has_session());
    assert!(second.known_keys().iter().all(|key| key.starts_with("_stitch.app2.")));
}
