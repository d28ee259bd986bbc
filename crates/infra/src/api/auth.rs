//! Session lifecycle against the Stitch auth endpoints
//!
//! [`AuthManager`] owns every request that creates, renews or drops a
//! session: provider logins, logout, access-token refresh, OAuth redirects
//! and admin impersonation. Session state itself lives in the
//! [`SessionStore`]; the manager never caches tokens in memory.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::Method;
use serde_json::json;
use stitch_common::auth::{generate_state, is_expiring_now, parse_redirect_fragment};
use stitch_common::auth::STATE_VALIDATION_FAILED;
use stitch_core::{AuthState, SessionProvider, SessionStore};
use stitch_domain::constants::{AUTH_PATH, NEW_ACCESS_TOKEN_PATH};
use stitch_domain::{
    AuthProvider, AuthResponse, Credentials, DeviceInfo, NewAccessToken, Result, Session,
    StitchError,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::request::{json, RequestOptions, Requester};
use crate::errors::InfraError;

/// What [`AuthManager::handle_redirect`] did with a redirect fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The fragment carried no Stitch keys.
    NotFound,
    /// The server reported an error; it is now the stored auth error.
    Error(String),
    /// The returned state did not match the one we issued.
    StateMismatch,
    /// A session was delivered and stored.
    LoggedIn(Session),
    /// An identity link completed without a new session.
    Linked,
}

/// Login, logout, refresh and impersonation for one app.
pub struct AuthManager {
    requester: Requester,
    store: SessionStore,
    device: DeviceInfo,
    auth_url: String,
    expiry_margin_secs: i64,
    refresh_gate: Mutex<()>,
}

impl AuthManager {
    pub fn new(
        requester: Requester,
        store: SessionStore,
        device: DeviceInfo,
        auth_url: impl Into<String>,
        expiry_margin_secs: i64,
    ) -> Self {
        Self {
            requester,
            store,
            device,
            auth_url: auth_url.into(),
            expiry_margin_secs,
            refresh_gate: Mutex::new(()),
        }
    }

    // Accessors
    // -----------------------------------------------------------------

    pub fn session(&self) -> Session {
        self.store.session()
    }

    pub fn state(&self) -> AuthState {
        AuthState::current(&self.store)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.has_session()
    }

    pub fn authed_id(&self) -> Option<String> {
        self.store.user_id()
    }

    pub fn device_id(&self) -> Option<String> {
        self.store.device_id()
    }

    /// Device info as sent to the server, carrying the stored device id.
    pub fn device_info(&self) -> DeviceInfo {
        self.device.clone().with_device_id(self.store.device_id())
    }

    pub fn auth_error(&self) -> Option<String> {
        self.store.auth_error()
    }

    pub fn is_impersonating_user(&self) -> bool {
        self.store.is_impersonating()
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    // Login / logout
    // -----------------------------------------------------------------

    /// Log in with `credentials`, replacing any stored session.
    #[instrument(skip(self, provider, credentials), fields(provider = %provider))]
    pub async fn authenticate(
        &self,
        provider: AuthProvider,
        credentials: &Credentials,
    ) -> Result<Session> {
        let Some(login_path) = provider.login_path() else {
            return Err(StitchError::InvalidInput(format!(
                "{provider} logs in through a browser redirect; use oauth_login_url"
            )));
        };
        if !credentials.matches(provider) {
            return Err(StitchError::InvalidInput(format!(
                "credentials do not match provider {provider}"
            )));
        }

        let body = credentials.to_body(json!({ "device": self.device_info() }));
        let options = RequestOptions::new().with_json(&body)?;
        let response = self
            .requester
            .send(&format!("{AUTH_PATH}{login_path}"), Method::POST, None, &options)
            .await?;
        let auth: AuthResponse = json(response).await?;

        let session = Session::from(auth);
        self.store.clear();
        self.store.store_session(&session);
        self.store.clear_auth_error();

        info!(user_id = ?session.user_id, "Logged in");
        Ok(self.store.session())
    }

    /// Log in with a provider given by name.
    pub async fn authenticate_with(
        &self,
        provider: &str,
        credentials: &Credentials,
    ) -> Result<Session> {
        let provider: AuthProvider =
            provider.parse().map_err(|_| StitchError::ProviderNotFound(provider.to_string()))?;
        self.authenticate(provider, credentials).await
    }

    /// Drop the session on the server and locally.
    ///
    /// Local state is cleared whatever the server says; a failed request is
    /// still reported.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if !self.store.has_session() {
            self.store.clear();
            return Ok(());
        }

        let refresh_token = self.real_refresh_token()?;
        let outcome = match refresh_token {
            Some(token) => self
                .requester
                .send(AUTH_PATH, Method::DELETE, Some(&token), &RequestOptions::new())
                .await
                .map(|_| ()),
            None => Ok(()),
        };

        self.store.clear();
        match &outcome {
            Ok(()) => info!("Logged out"),
            Err(err) => warn!(error = %err, "Logout request failed; local session cleared"),
        }
        outcome
    }

    // Refresh
    // -----------------------------------------------------------------

    /// Fetch a new access token.
    ///
    /// Refreshes are serialised. When `stale_access_token` is given and the
    /// stored access token no longer matches it, another caller already
    /// refreshed and no request is made.
    #[instrument(skip_all)]
    pub async fn refresh(&self, stale_access_token: Option<&str>) -> Result<()> {
        let _guard = self.refresh_gate.lock().await;

        if let Some(stale) = stale_access_token {
            if self.store.access_token().as_deref() != Some(stale) {
                debug!("Access token already refreshed");
                return Ok(());
            }
        }

        if self.store.is_impersonating() {
            return self.impersonation_refresh().await;
        }

        let Some(refresh_token) = self.store.refresh_token() else {
            return Err(StitchError::AuthRequired);
        };
        let result = self
            .requester
            .send(NEW_ACCESS_TOKEN_PATH, Method::POST, Some(&refresh_token), &RequestOptions::new())
            .await;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                if err.is_invalid_session() {
                    warn!("Refresh token rejected; clearing session");
                    self.store.clear();
                }
                return Err(err);
            }
        };

        let token: NewAccessToken = json(response).await?;
        self.store.set_access_token(&token.access_token);
        info!("Refreshed access token");
        Ok(())
    }

    /// Refresh first when the stored access token is about to expire.
    ///
    /// Returns `true` when the token was expiring and has been replaced.
    pub async fn ensure_fresh(&self) -> Result<bool> {
        let Some(access_token) = self.store.access_token() else {
            return Ok(false);
        };
        if self.store.refresh_token().is_none() {
            return Ok(false);
        }
        if !is_expiring_now(&access_token, self.expiry_margin_secs) {
            return Ok(false);
        }

        debug!(margin_secs = self.expiry_margin_secs, "Access token expiring; refreshing");
        self.refresh(Some(&access_token)).await?;
        Ok(true)
    }

    // OAuth redirect
    // -----------------------------------------------------------------

    /// Browser URL that starts an OAuth login, remembering a fresh state.
    pub fn oauth_login_url(&self, provider: AuthProvider, redirect_url: &str) -> Result<Url> {
        if !provider.is_oauth() {
            return Err(StitchError::InvalidInput(format!(
                "{provider} does not log in through a browser redirect"
            )));
        }

        let state = generate_state();
        self.store.set_oauth_state(&state);

        let device = serde_json::to_vec(&self.device_info()).map_err(InfraError::from)?;
        let mut url = Url::parse(&format!("{}/oauth2/{provider}", self.auth_url))
            .map_err(|e| StitchError::Config(format!("invalid auth url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("redirect", redirect_url)
            .append_pair("state", &state)
            .append_pair("device", &URL_SAFE_NO_PAD.encode(device));
        Ok(url)
    }

    /// Apply an OAuth redirect fragment to the stored session.
    pub fn handle_redirect(&self, fragment: &str) -> RedirectOutcome {
        let our_state = self.store.oauth_state();
        let result = parse_redirect_fragment(fragment, our_state.as_deref());
        if !result.found {
            return RedirectOutcome::NotFound;
        }
        self.store.clear_oauth_state();

        if let Some(error) = result.last_error {
            warn!(error = %error, "OAuth redirect carried an error");
            self.store.set_auth_error(&error);
            return RedirectOutcome::Error(error);
        }
        if !result.state_valid {
            warn!("OAuth redirect state mismatch");
            self.store.set_auth_error(STATE_VALIDATION_FAILED);
            return RedirectOutcome::StateMismatch;
        }

        let Some(ua) = result.ua else {
            return RedirectOutcome::Linked;
        };
        let session = Session {
            access_token: Some(ua.access_token),
            refresh_token: Some(ua.refresh_token),
            user_id: Some(ua.user_id),
            device_id: Some(ua.device_id),
        };
        self.store.clear();
        self.store.store_session(&session);
        self.store.clear_auth_error();
        info!(user_id = ?session.user_id, "Logged in from OAuth redirect");
        RedirectOutcome::LoggedIn(self.store.session())
    }

    // Impersonation
    // -----------------------------------------------------------------

    /// Act as `user_id` until [`Self::stop_impersonation`].
    #[instrument(skip(self))]
    pub async fn start_impersonation(&self, user_id: &str) -> Result<()> {
        if !self.store.has_session() {
            return Err(StitchError::AuthRequired);
        }
        if self.store.is_impersonating() {
            return Err(StitchError::Impersonation("already impersonating a user".into()));
        }

        self.store.begin_impersonation(user_id)?;
        let result = {
            let _guard = self.refresh_gate.lock().await;
            self.impersonation_refresh().await
        };
        if let Err(err) = result {
            self.store.end_impersonation()?;
            return Err(err);
        }

        info!(user_id = %user_id, "Started impersonation");
        Ok(())
    }

    /// Return to the real session.
    #[instrument(skip(self))]
    pub async fn stop_impersonation(&self) -> Result<()> {
        let _guard = self.refresh_gate.lock().await;
        if !self.store.is_impersonating() {
            return Err(StitchError::Impersonation("not impersonating a user".into()));
        }
        self.store.end_impersonation()?;
        info!("Stopped impersonation");
        Ok(())
    }

    /// Fetch an access token for the impersonated user. Caller holds the gate.
    async fn impersonation_refresh(&self) -> Result<()> {
        let Some(user_id) = self.store.impersonated_user_id() else {
            return Err(StitchError::Impersonation("no impersonated user stored".into()));
        };
        let Some(refresh_token) = self.real_refresh_token()? else {
            return Err(StitchError::AuthRequired);
        };

        let response = self
            .requester
            .send(
                &format!("/admin/users/{user_id}/impersonate"),
                Method::POST,
                Some(&refresh_token),
                &RequestOptions::new(),
            )
            .await?;
        let auth: AuthResponse = json(response).await?;

        self.store.store_session(&Session {
            access_token: auth.access_token,
            refresh_token: Some(refresh_token),
            user_id: auth.user_id.or(Some(user_id)),
            device_id: auth.device_id,
        });
        debug!("Refreshed impersonation token");
        Ok(())
    }

    /// Refresh token of the real (non-impersonated) session.
    fn real_refresh_token(&self) -> Result<Option<String>> {
        if self.store.is_impersonating() {
            if let Some(real) = self.store.real_session()? {
                return Ok(real.refresh_token);
            }
        }
        Ok(self.store.refresh_token())
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("auth_url", &self.auth_url)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionProvider for AuthManager {
    fn session(&self) -> Session {
        self.store.session()
    }

    fn clear_session(&self) {
        self.store.clear();
    }

    async fn ensure_fresh(&self) -> Result<bool> {
        AuthManager::ensure_fresh(self).await
    }

    async fn refresh(&self, stale_access_token: Option<&str>) -> Result<()> {
        AuthManager::refresh(self, stale_access_token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stitch_common::storage::MemoryTokenStore;
    use stitch_common::testing::{expired_jwt, fresh_jwt};
    use stitch_domain::{ClientConfig, ErrorKind};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::HttpClient;

    fn manager(server: &MockServer) -> AuthManager {
        let config = ClientConfig::for_app("testapp").with_base_url(server.uri());
        let requester = Requester::new(HttpClient::new().unwrap(), config.app_url());
        let store = SessionStore::new(Arc::new(MemoryTokenStore::new()), "_stitch");
        AuthManager::new(requester, store, DeviceInfo::from_config(&config), config.auth_url(), 10)
    }

    const LOGIN_PATH: &str = "/api/client/v1.0/app/testapp/auth/local/userpass";
    const REFRESH_PATH: &str = "/api/client/v1.0/app/testapp/auth/newAccessToken";

    #[tokio::test]
    async fn login_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_partial_json(json!({
                "username": "user",
                "options": { "device": { "appId": "testapp" } },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": "u1", "accessToken": "at", "refreshToken": "rt", "deviceId": "d1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = manager(&server);
        let session = auth
            .authenticate(AuthProvider::Userpass, &Credentials::userpass("user", "pw"))
            .await
            .unwrap();

        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(auth.device_id().as_deref(), Some("d1"));
        assert_eq!(auth.state(), AuthState::LoggedIn);
    }

    #[tokio::test]
    async fn mismatched_credentials_make_no_request() {
        let server = MockServer::start().await;
        let auth = manager(&server);

        let err =
            auth.authenticate(AuthProvider::ApiKey, &Credentials::Anonymous).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = auth.authenticate_with("ldap", &Credentials::Anonymous).await.unwrap_err();
        assert!(matches!(err, StitchError::ProviderNotFound(name) if name == "ldap"));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_skips_when_token_already_replaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(0)
            .mount(&server)
            .await;

        let auth = manager(&server);
        auth.session_store().store_session(&Session {
            access_token: Some("current".into()),
            refresh_token: Some("rt".into()),
            user_id: Some("u1".into()),
            device_id: None,
        });

        auth.refresh(Some("stale")).await.unwrap();
        assert_eq!(auth.session().access_token.as_deref(), Some("current"));
    }

    #[tokio::test]
    async fn rejected_refresh_token_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .and(header("authorization", "Bearer rt"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid session", "errorCode": "InvalidSession"
            })))
            .mount(&server)
            .await;

        let auth = manager(&server);
        auth.session_store().store_session(&Session {
            access_token: Some("at".into()),
            refresh_token: Some("rt".into()),
            user_id: Some("u1".into()),
            device_id: Some("d1".into()),
        });

        let err = auth.refresh(None).await.unwrap_err();
        assert!(err.is_invalid_session());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.device_id().as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn ensure_fresh_only_refreshes_expiring_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "accessToken": fresh_jwt("u1") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = manager(&server);
        auth.session_store().store_session(&Session {
            access_token: Some(expired_jwt("u1")),
            refresh_token: Some("rt".into()),
            user_id: Some("u1".into()),
            device_id: None,
        });

        assert!(auth.ensure_fresh().await.unwrap());
        // Now fresh; a second check makes no request.
        assert!(!auth.ensure_fresh().await.unwrap());
    }

    #[tokio::test]
    async fn logout_while_logged_out_is_local() {
        let server = MockServer::start().await;
        let auth = manager(&server);
        auth.logout().await.unwrap();
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oauth_url_carries_state_and_device() {
        let server = MockServer::start().await;
        let auth = manager(&server);

        let url = auth.oauth_login_url(AuthProvider::Google, "https://app.example/cb").unwrap();
        assert!(url.path().ends_with("/auth/oauth2/google"));

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["redirect"], "https://app.example/cb");
        assert_eq!(Some(pairs["state"].clone()), auth.session_store().oauth_state());

        let device = URL_SAFE_NO_PAD.decode(&pairs["device"]).unwrap();
        let device: serde_json::Value = serde_json::from_slice(&device).unwrap();
        assert_eq!(device["appId"], "testapp");

        assert!(auth.oauth_login_url(AuthProvider::Userpass, "https://app.example/cb").is_err());
    }

    #[tokio::test]
    async fn redirect_with_bad_state_records_error() {
        let server = MockServer::start().await;
        let auth = manager(&server);
        auth.session_store().set_oauth_state("ours");

        let outcome = auth.handle_redirect("#_stitch_state=theirs&_stitch_ua=a$b$c$d");
        assert_eq!(outcome, RedirectOutcome::StateMismatch);
        assert_eq!(auth.auth_error().as_deref(), Some(STATE_VALIDATION_FAILED));
        assert_eq!(auth.session_store().oauth_state(), None);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn redirect_without_keys_is_a_no_op() {
        let server = MockServer::start().await;
        let auth = manager(&server);
        auth.session_store().set_oauth_state("ours");

        assert_eq!(auth.handle_redirect("#foo=bar"), RedirectOutcome::NotFound);
        assert_eq!(auth.session_store().oauth_state().as_deref(), Some("ours"));
    }
}
