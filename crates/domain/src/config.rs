//! Client configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADMIN_API_PREFIX, AUTH_PATH, CLIENT_API_PREFIX, DEFAULT_EXPIRY_MARGIN_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STITCH_SERVER_URL, DEFAULT_STORAGE_NAMESPACE,
};

/// Configuration for a Stitch client.
///
/// Every field has a default so partial TOML/JSON files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `https://stitch.mongodb.com`
    pub base_url: String,
    /// Client app id. `None` targets the admin API.
    pub app_id: Option<String>,
    /// Reported in device info
    pub app_version: String,
    /// Reported in device info
    pub platform_version: String,
    pub timeout_secs: u64,
    /// Refresh proactively when the access token expires within this window
    pub expiry_margin_secs: i64,
    /// Prefix for every token store key
    pub storage_namespace: String,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STITCH_SERVER_URL.to_string(),
            app_id: None,
            app_version: String::new(),
            platform_version: String::new(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            expiry_margin_secs: DEFAULT_EXPIRY_MARGIN_SECS,
            storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Config for an app-scoped client with every other field defaulted.
    pub fn for_app(app_id: impl Into<String>) -> Self {
        Self { app_id: Some(app_id.into()), ..Self::default() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Root every resource path is appended to.
    pub fn app_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.app_id.as_deref().filter(|id| !id.is_empty()) {
            Some(app_id) => format!("{base}{CLIENT_API_PREFIX}/{app_id}"),
            None => format!("{base}{ADMIN_API_PREFIX}"),
        }
    }

    pub fn auth_url(&self) -> String {
        format!("{}{}", self.app_url(), AUTH_PATH)
    }
}
