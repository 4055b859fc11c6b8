//! Transport seam for outbound calls.
//!
//! The gateway speaks to the network through the `Transport` trait; the
//! production implementation is `HttpTransport` over reqwest. Payloads cross
//! the seam as raw JSON values so the gateway can apply its envelope
//! handling before anything is typed.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// HTTP request timeout in seconds.
/// 60s covers the sync backend's slow maintenance endpoints while still
/// failing within a tolerable wait.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Outbound HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Per-call options applied by the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Bearer credential, attached by the gateway when a session is active.
    pub bearer_token: Option<String>,
    /// Extra headers for this call only.
    pub headers: Vec<(String, String)>,
}

/// Failure shape produced by the transport: an optional HTTP status, the
/// parsed error body when the server sent one, and a transport-level
/// description.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub data: Option<Value>,
    pub message: String,
}

impl TransportError {
    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        self.data.as_ref()?.get("message")?.as_str()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value, TransportError>;
}

/// reqwest-backed transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        if let Some(ref token) = options.bearer_token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = body {
            request = request.json(body);
        }

        debug!(method = method.as_str(), url, "Sending request");

        let response = request.send().await.map_err(|error| TransportError {
            status: error.status().map(|s| s.as_u16()),
            data: None,
            message: error.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(|error| TransportError {
                status: Some(status.as_u16()),
                data: None,
                message: error.to_string(),
            })?;
            // 204s and empty DELETE responses decode as null
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&bytes).map_err(|error| TransportError {
                status: Some(status.as_u16()),
                data: None,
                message: format!("Invalid JSON in response: {}", error),
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let data = serde_json::from_str(&body).ok();
            Err(TransportError {
                status: Some(status.as_u16()),
                data,
                message: format!("Request failed with status {}", status.as_u16()),
            })
        }
    }
}
