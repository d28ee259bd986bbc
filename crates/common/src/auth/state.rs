//! OAuth state tokens
//!
//! The state parameter ties a redirect back to the login request that
//! started it (CSRF protection).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

const STATE_BYTES: usize = 32;

/// Generate a random state token.
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
#[must_use]
pub fn generate_state() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..STATE_BYTES).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Validate that the state received in a redirect matches the stored one.
///
/// A missing stored state never validates.
#[must_use]
pub fn validate_state(expected: Option<&str>, actual: &str) -> bool {
    matches!(expected, Some(expected) if !expected.is_empty() && expected == actual)
}
