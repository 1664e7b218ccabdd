//! REST clients for the pet-store service.
//!
//! Client methods issue exactly one HTTP request and hand back the captured
//! [`ApiResponse`] whatever the status code. Deciding what a status means is
//! the caller's job; [`ApiResponse::expect_status`] is the usual way to do it.

mod pet;
mod user;

pub use pet::{Category, Pet, PetApi, PetStatus, Tag};
pub use user::{User, UserApi};

use crate::result::{ProbeError, ProbeResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Envelope the service uses for acknowledgements and errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Status code echoed in the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Message category, e.g. `unknown`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free-form message; for writes this is often the entity id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A captured HTTP exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: String,
    /// Response status code
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// Time until the whole body was read
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ProbeResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Fail with [`ProbeError::HttpStatusMismatch`] unless the status is `expected`
    pub fn expect_status(&self, expected: u16) -> ProbeResult<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(ProbeError::HttpStatusMismatch {
                method: self.method.to_string(),
                url: self.url.clone(),
                expected,
                actual: self.status,
            })
        }
    }
}

/// Shared HTTP plumbing for the resource clients
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProbeResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Returns the base URL, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request with a JSON body and JSON content negotiation
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ProbeResult<ApiResponse> {
        let request = self
            .client
            .request(method.clone(), self.url(path))
            .headers(json_headers())
            .json(body);
        self.execute(method, path, request).await
    }

    /// Request without a body
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        query: &[(&str, String)],
    ) -> ProbeResult<ApiResponse> {
        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(method, path, request).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> ProbeResult<ApiResponse> {
        let start = Instant::now();
        let response = request.send().await?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        let elapsed = start.elapsed();
        debug!(%method, path, status, elapsed_ms = elapsed.as_millis() as u64, "http");
        Ok(ApiResponse {
            method,
            url,
            status,
            body,
            elapsed,
        })
    }
}

pub(crate) fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let json = HeaderValue::from_static("application/json");
    let _ = headers.insert(CONTENT_TYPE, json.clone());
    let _ = headers.insert(ACCEPT, json);
    headers
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            method: Method::GET,
            url: "http://petstore.local/v2/pet/7".to_string(),
            status,
            body: body.to_string(),
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_expect_status() {
        assert!(response(200, "{}").expect_status(200).is_ok());
        let err = response(404, "{}").expect_status(200).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GET http://petstore.local/v2/pet/7: expected HTTP 200, got 404"
        );
    }

    #[test]
    fn test_is_success() {
        assert!(response(200, "").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(405, "").is_success());
    }

    #[test]
    fn test_message_envelope() {
        let msg: ApiMessage = response(200, r#"{"code":200,"type":"unknown","message":"42"}"#)
            .json()
            .unwrap();
        assert_eq!(msg.code, Some(200));
        assert_eq!(msg.kind.as_deref(), Some("unknown"));
        assert_eq!(msg.message.as_deref(), Some("42"));
    }

    #[test]
    fn test_json_error_on_html_body() {
        let err = response(500, "<html>").json::<ApiMessage>().unwrap_err();
        assert!(matches!(err, ProbeError::Json(_)));
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = ApiClient::new("http://petstore.local/v2/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://petstore.local/v2");
        assert_eq!(client.url("/pet"), "http://petstore.local/v2/pet");
    }
}
