//! Error classes shared by the search MCP servers
//!
//! Every tool failure falls into one of four [`FailureClass`]es. The class
//! decides which MCP error code the caller sees; the message carries the
//! detail.

use rmcp::ErrorData as McpError;
use serde_json::json;
use std::fmt;

/// Broad category of a tool failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Malformed or out-of-range input, caught before any network call
    Validation,
    /// Network failure or timeout
    Transport,
    /// The remote API answered with an error
    Provider,
    /// The requested resource does not exist (video, transcript, language)
    NotFound,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::Validation => "validation",
            FailureClass::Transport => "transport",
            FailureClass::Provider => "provider",
            FailureClass::NotFound => "not_found",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the MCP error for a failure of the given class
///
/// The class name is attached as `{"class": ...}` error data so callers can
/// branch on it without parsing the message.
pub fn failure(class: FailureClass, message: impl Into<String>) -> McpError {
    let message = message.into();
    let data = Some(json!({ "class": class.as_str() }));
    match class {
        FailureClass::Validation => McpError::invalid_params(message, data),
        FailureClass::NotFound => McpError::resource_not_found(message, data),
        FailureClass::Transport | FailureClass::Provider => McpError::internal_error(message, data),
    }
}

/// Trait for converting errors into MCP-compatible errors
///
/// Domain error enums implement this so tool bodies can finish with
/// `.map_err(IntoMcpError::into_mcp_error)`.
pub trait IntoMcpError {
    /// Convert this error into an MCP error
    fn into_mcp_error(self) -> McpError;
}

/// Read the failure class back out of an MCP error produced by [`failure`]
pub fn failure_class(err: &McpError) -> Option<FailureClass> {
    let class = err.data.as_ref()?.get("class")?.as_str()?;
    match class {
        "validation" => Some(FailureClass::Validation),
        "transport" => Some(FailureClass::Transport),
        "provider" => Some(FailureClass::Provider),
        "not_found" => Some(FailureClass::NotFound),
        _ => None,
    }
}
