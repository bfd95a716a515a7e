//! Transport abstraction for the remote check request
//!
//! The rule only needs "send a GET, give me the body back". Hosts can plug
//! in their own client by implementing [`Transport`]; [`ReqwestTransport`]
//! is the default implementation.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::{RuleResult, RuleError, TransportError};
use crate::query::QueryParams;

/// HTTP method of a remote check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
        }
    }
}

/// Everything needed to issue one remote check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub url: String,
    pub params: QueryParams,
}

/// Response as handed back by a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 response carrying `body`
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// HTTP client used by remote rules
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and return the decoded response.
    ///
    /// Implementations must report non-2xx answers as errors.
    async fn send(&self, options: &RequestOptions) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, options: &RequestOptions) -> Result<RawResponse, TransportError> {
        (**self).send(options).await
    }
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Config`] when the client cannot be built.
    pub fn new(config: &TransportConfig) -> RuleResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RuleError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Reuse an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, options: &RequestOptions) -> Result<RawResponse, TransportError> {
        debug!(method = %options.method, url = %options.url, "Sending remote validation request");

        let response = self
            .client
            .request(options.method.into(), options.url.as_str())
            .query(&options.params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(RawResponse::new(status.as_u16(), decode_body(text)))
    }
}

/// JSON bodies are decoded, anything else is kept as text.
pub(crate) fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}
