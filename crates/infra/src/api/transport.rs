//! Public and authenticated requests
//!
//! Authenticated requests refresh the access token at most once per call:
//! proactively when the stored token is about to expire, or reactively when
//! the server rejects the session. A rejection after a proactive refresh
//! clears the session.

use std::sync::Arc;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use stitch_core::SessionProvider;
use stitch_domain::{Result, StitchError};
use tracing::{debug, instrument, warn};

use super::request::{json, RequestOptions, Requester};

/// Sends requests on behalf of the current session.
#[derive(Clone)]
pub struct Transport {
    requester: Requester,
    session: Arc<dyn SessionProvider>,
}

impl Transport {
    pub fn new(requester: Requester, session: Arc<dyn SessionProvider>) -> Self {
        Self { requester, session }
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    /// Request without authorization, decoding the JSON response body.
    #[instrument(skip(self, options))]
    pub async fn do_public<T: DeserializeOwned>(
        &self,
        resource: &str,
        method: Method,
        options: &RequestOptions,
    ) -> Result<T> {
        let response = self.requester.send(resource, method, None, options).await?;
        json(response).await
    }

    /// Request authorised with the stored access (or refresh) token.
    ///
    /// An invalid-session rejection triggers one refresh and one retry of
    /// the same request. A second rejection, a rejection after a proactive
    /// refresh, or a rejection with `refresh_on_failure` off clears the
    /// session.
    #[instrument(skip(self, options))]
    pub async fn do_authed(
        &self,
        resource: &str,
        method: Method,
        options: &RequestOptions,
    ) -> Result<Response> {
        if !self.session.session().is_active() {
            return Err(StitchError::AuthRequired);
        }
        let mut retried =
            if options.use_refresh_token { false } else { self.session.ensure_fresh().await? };

        loop {
            let session = self.session.session();
            let token = if options.use_refresh_token {
                session.refresh_token.as_deref()
            } else {
                session.access_token.as_deref()
            };

            let err = match self.requester.send(resource, method.clone(), token, options).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };
            if !err.is_invalid_session() {
                return Err(err);
            }

            if retried || !options.refresh_on_failure {
                warn!(retried, "Session rejected; clearing");
                self.session.clear_session();
                return Err(err);
            }

            warn!("Session rejected; refreshing and retrying once");
            if let Err(refresh_err) = self.session.refresh(session.access_token.as_deref()).await {
                debug!(error = %refresh_err, "Refresh before retry failed");
                return Err(err);
            }
            retried = true;
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").field("requester", &self.requester).finish_non_exhaustive()
    }
}
