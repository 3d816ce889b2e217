//! Transport: one GET per invocation against a JSON API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{AdapterError, AdapterResult};
use crate::mapper::QueryParams;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A provider response: the body exactly as received plus its parsed form
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    body: String,
    value: Value,
}

impl Document {
    /// Parse a response body; anything but JSON is a decode failure.
    pub fn parse(endpoint: &str, body: String) -> AdapterResult<Self> {
        let value = serde_json::from_str(&body).map_err(|e| AdapterError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { body, value })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Something that can answer a mapped request with a JSON document
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Send one request to `endpoint` with `query`
    async fn get(&self, endpoint: &str, query: &QueryParams) -> AdapterResult<Document>;
}

/// Settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl HttpSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("search-adapter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// reqwest-backed transport for JSON APIs such as SerpAPI
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout_seconds: u64,
}

impl HttpTransport {
    pub fn new(settings: HttpSettings) -> AdapterResult<Self> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| AdapterError::validation("base_url", format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(settings.user_agent)
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| AdapterError::Transport {
                endpoint: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            timeout_seconds: settings.timeout_seconds,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, endpoint: &str, query: &QueryParams) -> AdapterResult<Document> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query.pairs())
            .send()
            .await
            .map_err(|e| AdapterError::from_reqwest(endpoint, self.timeout_seconds, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest(endpoint, self.timeout_seconds, e))?;

        if !status.is_success() {
            let message = provider_message(&body).unwrap_or_else(|| body.trim().to_string());
            tracing::warn!(endpoint, status = status.as_u16(), %message, "Provider error");
            return Err(AdapterError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let document = Document::parse(endpoint, body)?;
        if let Some(message) = document.value().get("error").and_then(Value::as_str) {
            tracing::warn!(endpoint, %message, "Provider reported an error");
            return Err(AdapterError::Provider {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        Ok(document)
    }
}

/// The `error` string of a JSON error body, if it has one
fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
