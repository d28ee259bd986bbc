//! Integration tests for auth helpers
//!
//! Covers the redirect round-trip: a generated state is validated by the
//! fragment parser, and fixture tokens drive the expiry checks.

#![cfg(feature = "test-utils")]

use stitch_common::auth::{
    generate_state, is_expiring, is_expiring_now, parse_redirect_fragment, RedirectUserAuth,
};
use stitch_common::testing::{expired_jwt, fresh_jwt, init_test_tracing, jwt_with_exp};

fn fragment(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// A redirect that echoes our generated state and carries a session is
/// accepted in full.
#[test]
fn test_redirect_with_generated_state() {
    init_test_tracing();

    let state = generate_state();
    let access = fresh_jwt("user-1");
    let ua = format!("{access}$refresh-token$user-1$device-1");

    let result = parse_redirect_fragment(
        &format!("#{}", fragment(&[("_stitch_state", &state), ("_stitch_ua", &ua)])),
        Some(&state),
    );

    assert!(result.found);
    assert!(result.state_valid);
    assert_eq!(result.last_error, None);
    assert_eq!(
        result.ua,
        Some(RedirectUserAuth {
            access_token: access,
            refresh_token: "refresh-token".into(),
            user_id: "user-1".into(),
            device_id: "device-1".into(),
        })
    );
}

/// A state from another login attempt never validates.
#[test]
fn test_redirect_with_foreign_state() {
    let ours = generate_state();
    let theirs = generate_state();

    let result = parse_redirect_fragment(&fragment(&[("_stitch_state", &theirs)]), Some(&ours));
    assert!(result.found);
    assert!(!result.state_valid);

    let result = parse_redirect_fragment(&fragment(&[("_stitch_state", &theirs)]), None);
    assert!(!result.state_valid);
}

/// Server errors are percent-decoded.
#[test]
fn test_redirect_error_is_decoded() {
    let result =
        parse_redirect_fragment(&fragment(&[("_stitch_error", "access denied: user")]), None);
    assert_eq!(result.last_error.as_deref(), Some("access denied: user"));
    assert!(result.found);
}

#[test]
fn test_expiry_margin() {
    init_test_tracing();

    assert!(is_expiring_now(&expired_jwt("u"), 10));
    assert!(!is_expiring_now(&fresh_jwt("u"), 10));

    let token = jwt_with_exp("u", 1_000);
    assert!(is_expiring(&token, 0, 1_000));
    assert!(!is_expiring(&token, 0, 999));
    assert!(is_expiring(&token, 60, 940));
}
