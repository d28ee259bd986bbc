//! Test fixture generators
//!
//! Tokens shaped like the ones a Stitch server issues, plus random ids.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

/// Random alphanumeric filler for token signatures.
fn random_signature(len: usize) -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

/// Random 24-hex-digit id, the shape of user and device ids.
pub fn random_object_id_hex() -> String {
    let mut rng = rand::thread_rng();
    (0..12).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

/// Unsigned JWT whose payload is `{"sub": subject, "exp": exp}`.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use stitch_common::auth::jwt::decode_claims;
/// use stitch_common::testing::fixtures::jwt_with_exp;
///
/// let token = jwt_with_exp("user", 1_700_000_000);
/// assert_eq!(decode_claims(&token).unwrap().exp, Some(1_700_000_000));
/// # }
/// ```
pub fn jwt_with_exp(subject: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({ "sub": subject, "exp": exp }).to_string();
    let payload = URL_SAFE_NO_PAD.encode(payload.as_bytes());
    format!("{header}.{payload}.{}", random_signature(16))
}

/// Token that expired an hour ago.
pub fn expired_jwt(subject: &str) -> String {
    jwt_with_exp(subject, chrono::Utc::now().timestamp() - 3600)
}

/// Token valid for another hour.
pub fn fresh_jwt(subject: &str) -> String {
    jwt_with_exp(subject, chrono::Utc::now().timestamp() + 3600)
}
