//! Error types for the search adapter

use mcp_common::{failure, FailureClass, IntoMcpError, McpError};
use thiserror::Error;

/// Errors raised while mapping, sending or decoding a search request
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A parameter was missing, malformed or out of range
    #[error("invalid parameter '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// The request never got an HTTP response
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The request exceeded the configured timeout
    #[error("request to {endpoint} timed out after {seconds}s")]
    Timeout { endpoint: String, seconds: u64 },

    /// Non-success status, or an `error` field in the response body
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl AdapterError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AdapterError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            AdapterError::Validation { .. } => FailureClass::Validation,
            AdapterError::Transport { .. } | AdapterError::Timeout { .. } => {
                FailureClass::Transport
            }
            AdapterError::Provider { .. } | AdapterError::Decode { .. } => FailureClass::Provider,
        }
    }

    /// Classify a reqwest failure for `endpoint`
    pub fn from_reqwest(endpoint: &str, timeout_seconds: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout {
                endpoint: endpoint.to_string(),
                seconds: timeout_seconds,
            }
        } else if err.is_decode() {
            AdapterError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            AdapterError::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl IntoMcpError for AdapterError {
    fn into_mcp_error(self) -> McpError {
        failure(self.class(), self.to_string())
    }
}

impl From<AdapterError> for McpError {
    fn from(err: AdapterError) -> Self {
        err.into_mcp_error()
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
