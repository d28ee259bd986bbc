//! Authentication providers and credentials

use serde_json::{json, Value};

use crate::impl_wire_name_conversions;

/// Authentication providers the client knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    Anon,
    Userpass,
    ApiKey,
    Google,
    Facebook,
}

impl_wire_name_conversions!(AuthProvider {
    Anon => "anon",
    Userpass => "userpass",
    ApiKey => "apiKey",
    Google => "google",
    Facebook => "facebook",
});

impl AuthProvider {
    /// Login path relative to the auth root (`/auth/<type>/<name>`), or `None`
    /// for providers that only log in through a browser redirect.
    pub const fn login_path(&self) -> Option<&'static str> {
        match self {
            Self::Anon => Some("/anon/user"),
            Self::Userpass => Some("/local/userpass"),
            Self::ApiKey => Some("/api/key"),
            Self::Google | Self::Facebook => None,
        }
    }

    pub const fn is_oauth(&self) -> bool {
        matches!(self, Self::Google | Self::Facebook)
    }
}

/// Credentials handed to [`AuthProvider`] login endpoints.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Userpass { username: String, password: String },
    ApiKey { key: String },
}

impl Credentials {
    pub fn userpass(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Userpass { username: username.into(), password: password.into() }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Whether these credentials can be used with `provider`.
    pub const fn matches(&self, provider: AuthProvider) -> bool {
        matches!(
            (self, provider),
            (Self::Anonymous, AuthProvider::Anon)
                | (Self::Userpass { .. }, AuthProvider::Userpass)
                | (Self::ApiKey { .. }, AuthProvider::ApiKey)
        )
    }

    /// Login request body, merged with the `options` object.
    pub fn to_body(&self, options: Value) -> Value {
        match self {
            Self::Anonymous => json!({ "options": options }),
            Self::Userpass { username, password } => {
                json!({ "username": username, "password": password, "options": options })
            }
            Self::ApiKey { key } => json!({ "key": key, "options": options }),
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Userpass { username, .. } => {
                f.debug_struct("Userpass").field("username", username).finish_non_exhaustive()
            }
            Self::ApiKey { .. } => f.write_str("ApiKey { .. }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse() {
        assert_eq!("apiKey".parse::<AuthProvider>().unwrap(), AuthProvider::ApiKey);
        assert_eq!("userpass".parse::<AuthProvider>().unwrap(), AuthProvider::Userpass);
        assert!("ldap".parse::<AuthProvider>().is_err());
    }

    #[test]
    fn oauth_providers_have_no_login_path() {
        assert!(AuthProvider::Google.is_oauth());
        assert_eq!(AuthProvider::Google.login_path(), None);
        assert_eq!(AuthProvider::Userpass.login_path(), Some("/local/userpass"));
    }

    #[test]
    fn credentials_body_includes_options() {
        let body = Credentials::userpass("user", "password").to_body(json!({ "device": {} }));
        assert_eq!(body["username"], "user");
        assert_eq!(body["password"], "password");
        assert!(body["options"]["device"].is_object());
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", Credentials::userpass("user", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        let rendered = format!("{:?}", Credentials::api_key("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn credentials_must_match_provider() {
        assert!(Credentials::api_key("k").matches(AuthProvider::ApiKey));
        assert!(!Credentials::api_key("k").matches(AuthProvider::Userpass));
        assert!(Credentials::Anonymous.matches(AuthProvider::Anon));
    }
}
