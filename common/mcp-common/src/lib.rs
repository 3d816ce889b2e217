//! MCP Common - Shared utilities for the search MCP servers
//!
//! - **Startup**: `.env` loading, tracing on stderr, stdio serving
//! - **Results**: helpers for building `CallToolResult` responses
//! - **Errors**: [`FailureClass`] and its mapping onto MCP error codes
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//! - **Prompts**: [`ToolCallPrompt`] for guided prompts that end in a tool call
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     mcp_common::load_dotenv(None);
//!     mcp_common::init_tracing("my_mcp")?;
//!     mcp_common::serve_stdio(MyServer::new(Config::load()?)?).await
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod prompt;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{decode_params, EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{failure, failure_class, FailureClass, IntoMcpError};
pub use init::{init_tracing, load_dotenv, serve_stdio};
pub use prompt::{parse_flag, ToolCallPrompt};
pub use result::{json_success, result_text, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
