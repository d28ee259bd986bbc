//! Request options and single-shot dispatch
//!
//! [`Requester`] sends one request against the app-scoped root and
//! classifies the response. It knows nothing about sessions; callers pass
//! the bearer token explicitly.

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stitch_domain::Result;

use super::errors::classify_response;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Per-request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Pre-encoded request body
    pub body: Option<String>,
    /// Query parameters, percent-encoded on send
    pub query: Vec<(String, String)>,
    /// Refresh and retry once when the server reports an invalid session
    pub refresh_on_failure: bool,
    /// Authorise with the refresh token instead of the access token
    pub use_refresh_token: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { body: None, query: Vec::new(), refresh_on_failure: true, use_refresh_token: false }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialise `body` as the JSON request body.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_string(body).map_err(InfraError::from)?;
        Ok(self.with_body(encoded))
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_failure = false;
        self
    }

    #[must_use]
    pub fn using_refresh_token(mut self) -> Self {
        self.use_refresh_token = true;
        self
    }
}

/// Sends requests relative to a fixed root URL.
#[derive(Debug, Clone)]
pub struct Requester {
    http: HttpClient,
    base_url: String,
}

impl Requester {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, resource: &str) -> String {
        format!("{}{}", self.base_url, resource)
    }

    /// Send one request; non-2xx responses come back as errors.
    pub async fn send(
        &self,
        resource: &str,
        method: Method,
        bearer: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Response> {
        let mut builder = self.http.request(method, self.url(resource));
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        let response = self.http.send(builder).await?;
        classify_response(response).await
    }
}

/// Decode a successful response body as JSON.
pub async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(InfraError::from)?;
    Ok(serde_json::from_slice(&bytes).map_err(InfraError::from)?)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn sends_body_query_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/app/things"))
            .and(query_param("filter", "a b"))
            .and(header("authorization", "Bearer token-1"))
            .and(body_json(serde_json::json!({ "x": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let requester = Requester::new(HttpClient::new().unwrap(), format!("{}/app/", server.uri()));
        let options = RequestOptions::new()
            .with_json(&serde_json::json!({ "x": 1 }))
            .unwrap()
            .with_query("filter", "a b");

        let response =
            requester.send("/things", Method::POST, Some("token-1"), &options).await.unwrap();
        let body: serde_json::Value = json(response).await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let requester = Requester::new(HttpClient::new().unwrap(), server.uri());
        requester.send("/", Method::GET, None, &RequestOptions::new()).await.unwrap();
    }

    #[test]
    fn defaults_refresh_on_failure() {
        let options = RequestOptions::new();
        assert!(options.refresh_on_failure);
        assert!(!options.use_refresh_token);

        let options = options.without_refresh().using_refresh_token();
        assert!(!options.refresh_on_failure);
        assert!(options.use_refresh_token);
    }
}
