//! Response classification
//!
//! Turns non-2xx responses into [`StitchError`]s. JSON bodies of the shape
//! `{"error": ..., "errorCode": ...}` become server errors; anything else
//! becomes a transport error carrying the HTTP status text.

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::Deserialize;
use stitch_domain::constants::JSON_CONTENT_TYPE;
use stitch_domain::{ResponseInfo, Result, StitchError};
use tracing::warn;

/// Error body returned by the server.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

fn response_info(response: &Response) -> ResponseInfo {
    let status = response.status();
    ResponseInfo {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("unknown status").to_string(),
        url: response.url().to_string(),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}

/// Error body fields, or none when the body is not the expected JSON.
fn parse_error_body(bytes: &[u8], info: &ResponseInfo) -> ErrorBody {
    serde_json::from_slice(bytes).unwrap_or_else(|err| {
        warn!(status = info.status, url = %info.url, error = %err, "Malformed JSON error body");
        ErrorBody::default()
    })
}

/// Pass 2xx responses through; convert everything else into an error.
pub async fn classify_response(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let info = response_info(&response);
    if !is_json(&response) {
        return Err(StitchError::Transport {
            status_text: info.status_text.clone(),
            response: info,
        });
    }

    let body = match response.bytes().await {
        Ok(bytes) => parse_error_body(&bytes, &info),
        Err(err) => {
            warn!(status = info.status, error = %err, "Could not read error response body");
            ErrorBody::default()
        }
    };
    let message = body.error.unwrap_or_else(|| info.status_text.clone());
    Err(StitchError::server(message, body.error_code, Some(info)))
}

#[cfg(test)]
mod tests {
    use stitch_domain::ErrorKind;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn respond(template: ResponseTemplate) -> Result<Response> {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(template).mount(&server).await;
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let response = client.get(server.uri()).send().await.unwrap();
        classify_response(response).await
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = respond(ResponseTemplate::new(200).set_body_string("{}")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn json_errors_carry_code() {
        let err = respond(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid session",
            "errorCode": "InvalidSession",
        })))
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidSession);
        assert_eq!(err.to_string(), "invalid session");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn code_match_is_case_sensitive() {
        let err = respond(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "nope",
            "errorCode": "invalidsession",
        })))
        .await
        .unwrap_err();

        assert!(!err.is_invalid_session());
        assert_eq!(err.kind(), ErrorKind::StitchError);
    }

    #[tokio::test]
    async fn malformed_json_errors_fall_back_to_status_text() {
        stitch_common::testing::init_test_tracing();
        let err = respond(ResponseTemplate::new(503).set_body_raw("{not json", "application/json"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StitchError);
        assert_eq!(err.to_string(), "Service Unavailable");
        assert_eq!(err.code(), None);
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn non_json_errors_are_transport_errors() {
        let err = respond(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert_eq!(err.to_string(), "Bad Gateway");
        assert_eq!(err.status(), Some(502));
    }
}
