//! Access-token expiry claims
//!
//! Access tokens are JWTs. Only the payload's `exp` claim is read; the
//! signature is never verified client-side.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

/// Failure to read claims from a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),

    #[error("token payload is not a JSON object: {0}")]
    Payload(String),
}

/// The registered claims the SDK cares about.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the payload segment of `token`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClaimsError::Malformed);
    };

    // Some issuers keep the padding; the no-pad engine rejects it.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Payload(e.to_string()))
}

/// Seconds until `token` expires, relative to `now` (unix seconds).
///
/// `None` when the token cannot be decoded or carries no `exp`. Claims far
/// outside the clock's range saturate rather than overflow.
pub fn seconds_until_expiry(token: &str, now: i64) -> Option<i64> {
    decode_claims(token).ok()?.exp.map(|exp| exp.saturating_sub(now))
}

/// Whether `token` expires within `margin_secs` of `now`.
///
/// Undecodable tokens and tokens without `exp` never count as expiring.
pub fn is_expiring(token: &str, margin_secs: i64, now: i64) -> bool {
    seconds_until_expiry(token, now).is_some_and(|remaining| remaining <= margin_secs)
}

/// [`is_expiring`] against the system clock.
pub fn is_expiring_now(token: &str, margin_secs: i64) -> bool {
    is_expiring(token, margin_secs, chrono::Utc::now().timestamp())
}
