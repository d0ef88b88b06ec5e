//! Raw transport to the upstream directory API.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

/// Failures below the HTTP layer. These are never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not establish a connection to the upstream.
    #[error("connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// The upstream did not answer within the request timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Any other failure while sending the request or reading the body.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

/// An outbound request. Cheap to clone so it can be resent on retry.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::DELETE,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the upstream signalled throttling.
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }
}

/// Something that can execute an [`UpstreamRequest`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError>;
}

/// reqwest-backed transport with connect and request deadlines.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    fn classify(url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(&request.url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(&request.url, e))?;

        metrics::record_upstream_request(request.method.as_str(), status.as_u16());
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = %status,
            "Upstream responded"
        );

        Ok(UpstreamResponse { status, body })
    }
}
