//! Result helpers for MCP tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

use crate::error::{failure, FailureClass};

/// Successful response carrying pretty-printed JSON for `data`
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| failure(FailureClass::Provider, e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Successful plain text response
///
/// Rendered tool output (raw bodies, markdown, transcripts) is always handed
/// back as a single text item.
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// First text item of a result, if any
///
/// Used by in-process callers and tests that want the rendered string back.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .iter()
        .find_map(|content| content.as_text().map(|text| text.text.as_str()))
}
