//! Transport to the registry.
//!
//! The dispatcher only needs "send this request, give me the parsed
//! document or a transport failure". [`HttpTransport`] does that over
//! reqwest; tests plug in their own [`Transport`].

use crate::xml;
use async_trait::async_trait;
use eidr_query::resolve::Method;
use eidr_query::EidrError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// A fully-formed registry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRequest {
    pub method: Method,
    /// Path and query string, starting with `/`
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RegistryRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the decoded response document.
    ///
    /// Non-success HTTP outcomes are reported as [`EidrError::Transport`].
    async fn send(&self, request: RegistryRequest) -> Result<Value, EidrError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EidrError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            EidrError::Transport {
                status: 0,
                message: format!("failed to create HTTP client: {e}"),
            }
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RegistryRequest) -> Result<Value, EidrError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending registry request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        let body = check_status(status, text).inspect_err(|e| {
            warn!(status = e.status_code(), %url, "registry request failed");
        })?;
        xml::parse_document(&body)
    }
}

/// Pass a 2xx body through; anything else becomes a transport error carrying
/// the HTTP status and the body, or the status reason when the body is empty.
fn check_status(status: StatusCode, body: String) -> Result<String, EidrError> {
    if status.is_success() {
        return Ok(body);
    }
    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("request failed").to_string(),
        text => text.to_string(),
    };
    Err(EidrError::Transport {
        status: status.as_u16(),
        message,
    })
}

fn transport_error(e: reqwest::Error) -> EidrError {
    let status = e.status().map(|s| s.as_u16()).unwrap_or(0);
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    EidrError::Transport { status, message }
}
