//! HTTP transport
//!
//! The gateway talks to the backend through the [`Transport`] trait. The
//! production implementation is [`HttpTransport`] over reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::{ClientError, ClientResult};

/// HTTP verbs used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    /// Bearer token to send, already decided by the gateway
    pub bearer: Option<String>,
}

/// A response as returned by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, `Null` when empty or not JSON
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// Configuration for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Backend base URL, e.g. "http://localhost:5000"
    pub base_url: String,
    /// Optional request timeout; none by default
    pub request_timeout: Option<Duration>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = uuid::Uuid::new_v4().to_string();

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &url)
            .header("x-request-id", &request_id);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(
                request_id = %request_id,
                method = %request.method,
                path = %request.path,
                "Request failed: {}",
                e
            );
            ClientError::from(e)
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            status,
            "Request completed"
        );

        Ok(ApiResponse { status, body })
    }
}
