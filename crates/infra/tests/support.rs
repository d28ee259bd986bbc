//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use stitch_common::storage::MemoryTokenStore;
use stitch_common::testing::init_test_tracing;
use stitch_domain::ClientConfig;
use stitch_infra::StitchClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_ID: &str = "testapp";

/// Absolute request path for `resource` under the test app.
pub fn app_path(resource: &str) -> String {
    format!("/api/client/v1.0/app/{APP_ID}{resource}")
}

/// Client for the test app pointed at `server`, with an in-memory store.
pub fn client_for(server: &MockServer) -> (StitchClient, Arc<MemoryTokenStore>) {
    init_test_tracing();
    let store = Arc::new(MemoryTokenStore::new());
    let config = ClientConfig::for_app(APP_ID).with_base_url(server.uri());
    let client = StitchClient::with_token_store(config, store.clone()).expect("client builds");
    (client, store)
}

/// `{"error", "errorCode"}` body with the given status.
pub fn stitch_error(status: u16, message: &str, code: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "error": message, "errorCode": code }))
}

pub fn invalid_session() -> ResponseTemplate {
    stitch_error(401, "invalid session", "InvalidSession")
}

/// Mount a userpass login answering with `body`.
pub async fn mount_login(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(app_path("/auth/local/userpass")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Number of requests `server` received for `resource`.
pub async fn hits(server: &MockServer, resource: &str) -> usize {
    let wanted = app_path(resource);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == wanted)
        .count()
}
