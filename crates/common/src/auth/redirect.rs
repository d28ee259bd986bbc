//! OAuth redirect fragment parsing
//!
//! After an OAuth login the server redirects back with the outcome encoded
//! in the URL fragment as `&`-separated `key=value` pairs.

use serde::{Deserialize, Serialize};

pub const ERROR_FRAGMENT_KEY: &str = "_stitch_error";
pub const STATE_FRAGMENT_KEY: &str = "_stitch_state";
pub const USER_AUTH_FRAGMENT_KEY: &str = "_stitch_ua";
pub const LINK_FRAGMENT_KEY: &str = "_stitch_link";

/// Auth error recorded when the redirect's state does not match ours.
pub const STATE_VALIDATION_FAILED: &str = "STATE_VALIDATION_FAILED";

const USER_AUTH_SEPARATOR: char = '$';

/// Session carried by a `_stitch_ua` fragment value
/// (`accessToken$refreshToken$userId$deviceId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectUserAuth {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub device_id: String,
}

impl RedirectUserAuth {
    fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(USER_AUTH_SEPARATOR).collect();
        let [access_token, refresh_token, user_id, device_id] = parts.as_slice() else {
            return None;
        };
        Some(Self {
            access_token: (*access_token).to_string(),
            refresh_token: (*refresh_token).to_string(),
            user_id: (*user_id).to_string(),
            device_id: (*device_id).to_string(),
        })
    }
}

/// Outcome of parsing a redirect fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectResult {
    /// Whether any recognised key was present.
    pub found: bool,
    pub state_valid: bool,
    pub last_error: Option<String>,
    pub ua: Option<RedirectUserAuth>,
}

/// Parse `fragment` (with or without the leading `#`), validating any state
/// against `our_state`.
pub fn parse_redirect_fragment(fragment: &str, our_state: Option<&str>) -> RedirectResult {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut result = RedirectResult::default();

    for pair in fragment.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key);
        let value = decode_component(raw_value);

        match key.as_str() {
            ERROR_FRAGMENT_KEY => {
                result.last_error = Some(value);
                result.found = true;
            }
            STATE_FRAGMENT_KEY => {
                result.found = true;
                result.state_valid = super::state::validate_state(our_state, &value);
            }
            USER_AUTH_FRAGMENT_KEY => match RedirectUserAuth::parse(&value) {
                Some(ua) => {
                    result.ua = Some(ua);
                    result.found = true;
                }
                None => {
                    result.last_error = Some(format!("invalid user auth data in redirect: {value}"));
                }
            },
            LINK_FRAGMENT_KEY => result.found = true,
            _ => {}
        }
    }

    result
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
