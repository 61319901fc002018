// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport seam between the gateway and vendor APIs.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully built vendor HTTP request.
///
/// Carries credentials, so `Debug` redacts header values and query strings.
#[derive(Clone, PartialEq)]
pub struct VendorRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl VendorRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: Method::Get, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, url: url.into(), headers: Vec::new(), body: Some(body) }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL without its query string, safe to log.
    pub fn redacted_url(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

impl std::fmt::Debug for VendorRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("VendorRequest")
            .field("method", &self.method)
            .field("url", &self.redacted_url())
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorResponse {
    pub status: u16,
    /// Reason phrase, e.g. `Unauthorized`.
    pub status_text: String,
    /// Parsed JSON, or the raw text as a string when not JSON.
    pub body: Value,
}

impl VendorResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, status_text: "OK".to_string(), body }
    }

    pub fn error(status: u16, status_text: impl Into<String>) -> Self {
        Self { status, status_text: status_text.into(), body: Value::Null }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("vendor request timed out")]
    Timeout,
    #[error("vendor request failed: {0}")]
    Network(String),
}

/// Sends one request; never retries.
#[async_trait]
pub trait HttpTransport: Clone + Send + Sync + 'static {
    async fn send(&self, request: VendorRequest) -> Result<VendorResponse, TransportError>;
}

/// Production transport over a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codexi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: VendorRequest) -> Result<VendorResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(classify)?;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        tracing::debug!(url = request.redacted_url(), status = status.as_u16(), "vendor response");
        Ok(VendorResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

/// Strip the URL from reqwest errors; it may carry a key in the query.
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.without_url().to_string())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{HttpTransport, TransportError, VendorRequest, VendorResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeTransportState {
        calls: Vec<VendorRequest>,
        responses: VecDeque<Result<VendorResponse, TransportError>>,
    }

    /// Records requests and replays queued responses in order.
    #[derive(Clone, Default)]
    pub struct FakeTransport {
        inner: Arc<Mutex<FakeTransportState>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, response: Result<VendorResponse, TransportError>) {
            self.inner.lock().responses.push_back(response);
        }

        pub fn push_json(&self, body: Value) {
            self.push(Ok(VendorResponse::ok(body)));
        }

        /// Get all recorded requests
        pub fn calls(&self) -> Vec<VendorRequest> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, request: VendorRequest) -> Result<VendorResponse, TransportError> {
            let mut inner = self.inner.lock();
            inner.calls.push(request);
            inner
                .responses
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no response queued".into())))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
