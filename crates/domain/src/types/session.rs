//! Session types
//!
//! The session is the flat record of tokens the client currently holds.

use serde::{Deserialize, Serialize};

/// Tokens and identity held by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl Session {
    /// A session is active once the server handed out a user id or a token.
    pub fn is_active(&self) -> bool {
        self.access_token.is_some() || self.user_id.is_some()
    }
}

/// Body returned by login, impersonation and redirect flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl From<AuthResponse> for Session {
    fn from(value: AuthResponse) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            user_id: value.user_id,
            device_id: value.device_id,
        }
    }
}

/// Body returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccessToken {
    pub access_token: String,
}
