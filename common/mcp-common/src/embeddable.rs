//! Embeddable MCP trait for in-process execution
//!
//! A host that links a server crate directly can list its tools and call
//! them with a tool name plus a flat JSON parameter object, skipping the
//! stdio transport entirely.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let result = server
//!     .call_tool("google_search", serde_json::json!({"query": "rust", "num": 5}))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{failure_class, FailureClass};

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Parameters did not match the tool's schema
    #[error("invalid parameters for {tool}: {message}")]
    InvalidParams { tool: String, message: String },

    /// The tool ran and failed
    #[error("tool failed: {message}")]
    Failed {
        class: Option<FailureClass>,
        message: String,
    },
}

impl EmbeddableError {
    /// Failure class of a tool execution error, if it carried one
    pub fn class(&self) -> Option<FailureClass> {
        match self {
            EmbeddableError::ToolNotFound(_) => None,
            EmbeddableError::InvalidParams { .. } => Some(FailureClass::Validation),
            EmbeddableError::Failed { class, .. } => *class,
        }
    }
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::Failed {
            class: failure_class(&err),
            message: err.message.to_string(),
        }
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Decode a tool's parameter object, tagging failures with the tool name
pub fn decode_params<T: DeserializeOwned>(tool: &str, params: Value) -> EmbeddableResult<T> {
    // A missing argument object means "no parameters"
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| EmbeddableError::InvalidParams {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Trait for MCP servers that can be executed in-process
///
/// Implementations are `Send + Sync` so one server can serve concurrent
/// calls from several tasks.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name, matching the binary name
    fn server_name(&self) -> &str;

    /// All available tools with their input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Executes a tool by name with the given parameters
    ///
    /// Fails with [`EmbeddableError::ToolNotFound`] for unknown names,
    /// [`EmbeddableError::InvalidParams`] when `params` does not decode,
    /// and [`EmbeddableError::Failed`] when the tool itself fails.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Whether `name` is one of this server's tools
    fn has_tool(&self, name: &str) -> bool {
        self.list_tools().iter().any(|tool| tool.name.as_ref() == name)
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::failure;
    use serde::Deserialize;

    struct EchoServer;

    #[derive(Debug, Deserialize)]
    struct EchoParams {
        query: String,
    }

    #[async_trait]
    impl EmbeddableMcp for EchoServer {
        fn server_name(&self) -> &str {
            "echo"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
            match name {
                "echo" => {
                    let params: EchoParams = decode_params(name, params)?;
                    if params.query.is_empty() {
                        return Err(failure(FailureClass::Validation, "query is empty").into());
                    }
                    Ok(crate::text_success(params.query))
                }
                _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
            }
        }
    }

    #[test]
    fn test_call_unknown_tool() {
        let result = tokio_test::block_on(EchoServer.call_tool("unknown", serde_json::json!({})));
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_bad_params_are_invalid() {
        let err = EchoServer
            .call_tool("echo", serde_json::json!({"query": 5}))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddableError::InvalidParams { .. }));
        assert_eq!(err.class(), Some(FailureClass::Validation));
    }

    #[tokio::test]
    async fn test_tool_failure_keeps_class() {
        let err = EchoServer
            .call_tool("echo", serde_json::json!({"query": ""}))
            .await
            .unwrap_err();
        assert_eq!(err.class(), Some(FailureClass::Validation));
        assert!(err.to_string().contains("query is empty"));
    }

    #[test]
    fn test_has_tool_without_tools() {
        assert!(!EchoServer.has_tool("echo"));
    }
}
