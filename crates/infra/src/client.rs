//! Client facade
//!
//! [`StitchClient`] wires the token store, auth manager, transport and
//! pipeline executor for one app and exposes the user-facing operations.

use std::sync::Arc;
use std::time::Duration;

use bson::Bson;
use stitch_common::storage::{detect_token_store, TokenStore};
use stitch_core::{PipelineOptions, SessionStore};
use stitch_domain::constants::SESSION_STORAGE_KEYS;
use stitch_domain::{
    AuthProvider, ClientConfig, Credentials, DeviceInfo, Result, Session, Stage, StitchError,
};
use tracing::debug;
use url::Url;

use crate::api::{AuthManager, PipelineExecutor, RedirectOutcome, Requester, Transport};
use crate::http::HttpClient;
use crate::services::{MongoService, MONGODB_SERVICE};

/// Entry point for one Stitch app (or the admin API when no app id is set).
#[derive(Debug, Clone)]
pub struct StitchClient {
    config: ClientConfig,
    auth: Arc<AuthManager>,
    transport: Arc<Transport>,
    executor: PipelineExecutor,
}

impl StitchClient {
    /// Client persisting its session in the best available token store.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let service = format!("Stitch.{}", config.app_id.as_deref().unwrap_or("admin"));
        let known_keys = SESSION_STORAGE_KEYS
            .iter()
            .map(|field| format!("{}.{field}", config.storage_namespace));
        let store = detect_token_store(&service, known_keys);
        Self::with_token_store(config, store)
    }

    /// Client over an explicit token store.
    pub fn with_token_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let mut http = HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let requester = Requester::new(http.build()?, config.app_url());

        let session_store = SessionStore::new(store, config.storage_namespace.clone());
        let auth = Arc::new(AuthManager::new(
            requester.clone(),
            session_store,
            DeviceInfo::from_config(&config),
            config.auth_url(),
            config.expiry_margin_secs,
        ));
        let transport = Arc::new(Transport::new(requester, auth.clone()));
        let executor = PipelineExecutor::new(transport.clone());

        debug!(app_url = %config.app_url(), "Created Stitch client");
        Ok(Self { config, auth, transport, executor })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // Authentication
    // -----------------------------------------------------------------

    /// Log in with username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let credentials = Credentials::userpass(username, password);
        self.auth.authenticate(AuthProvider::Userpass, &credentials).await
    }

    pub async fn login_anonymous(&self) -> Result<Session> {
        self.auth.authenticate(AuthProvider::Anon, &Credentials::Anonymous).await
    }

    pub async fn login_with_api_key(&self, key: &str) -> Result<Session> {
        self.auth.authenticate(AuthProvider::ApiKey, &Credentials::api_key(key)).await
    }

    pub async fn authenticate(
        &self,
        provider: AuthProvider,
        credentials: &Credentials,
    ) -> Result<Session> {
        self.auth.authenticate(provider, credentials).await
    }

    /// Log in with a provider given by name; unknown names fail without a
    /// request.
    pub async fn authenticate_with(
        &self,
        provider: &str,
        credentials: &Credentials,
    ) -> Result<Session> {
        self.auth.authenticate_with(provider, credentials).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await
    }

    pub fn authed_id(&self) -> Option<String> {
        self.auth.authed_id()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn auth_error(&self) -> Option<String> {
        self.auth.auth_error()
    }

    pub fn oauth_login_url(&self, provider: AuthProvider, redirect_url: &str) -> Result<Url> {
        self.auth.oauth_login_url(provider, redirect_url)
    }

    pub fn handle_redirect(&self, fragment: &str) -> RedirectOutcome {
        self.auth.handle_redirect(fragment)
    }

    // Impersonation
    // -----------------------------------------------------------------

    pub async fn start_impersonation(&self, user_id: &str) -> Result<()> {
        self.auth.start_impersonation(user_id).await
    }

    pub async fn stop_impersonation(&self) -> Result<()> {
        self.auth.stop_impersonation().await
    }

    pub fn is_impersonating_user(&self) -> bool {
        self.auth.is_impersonating_user()
    }

    // Pipelines and services
    // -----------------------------------------------------------------

    /// Run `stages` with the extended-JSON codec.
    pub async fn execute_pipeline(&self, stages: &[Stage]) -> Result<Bson> {
        self.executor.execute_pipeline(stages, &PipelineOptions::default()).await
    }

    pub async fn execute_pipeline_with(
        &self,
        stages: &[Stage],
        options: &PipelineOptions,
    ) -> Result<Bson> {
        self.executor.execute_pipeline(stages, options).await
    }

    /// Helper for the service `name` of type `kind`.
    pub fn service(&self, kind: &str, name: &str) -> Result<MongoService> {
        match kind {
            MONGODB_SERVICE => Ok(MongoService::new(self.executor.clone(), name)),
            other => Err(StitchError::Config(format!("unknown service type: {other}"))),
        }
    }
}
