//! Guided prompts
//!
//! Each prompt a server exposes is a user request in plain words followed by
//! the assistant's suggested tool call. Prompt arguments reach us as strings,
//! so [`ToolCallPrompt`] converts numbers and flags back into the JSON types
//! the tool expects.

use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};
use serde_json::{Map, Value};

/// Builder for a prompt that ends in a single tool call
#[derive(Debug, Clone)]
pub struct ToolCallPrompt {
    tool: String,
    request: String,
    arguments: Map<String, Value>,
}

/// A prompt argument with surrounding whitespace removed; blank is absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read a boolean prompt argument: true/false, yes/no or 1/0
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    match present(value)?.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl ToolCallPrompt {
    /// Start from the opening words of the user's request
    pub fn new(tool: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            request: request.into(),
            arguments: Map::new(),
        }
    }

    /// Append a clause to the request unconditionally
    pub fn note(mut self, clause: impl AsRef<str>) -> Self {
        self.request.push(' ');
        self.request.push_str(clause.as_ref());
        self
    }

    /// String argument
    pub fn arg(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = present(value) {
            self.arguments.insert(key.to_string(), Value::from(value));
        }
        self
    }

    /// String argument that also adds `clause(value)` to the request
    pub fn described(self, key: &str, value: Option<&str>, clause: impl FnOnce(&str) -> String) -> Self {
        match present(value) {
            Some(v) => {
                let text = clause(v);
                self.note(text).arg(key, Some(v))
            }
            None => self,
        }
    }

    /// Integer argument; text that is not a number is passed through for the
    /// tool to reject with a proper message.
    pub fn integer(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = present(value) {
            let value = value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(value));
            self.arguments.insert(key.to_string(), value);
        }
        self
    }

    /// Boolean argument accepting true/false, yes/no and 1/0
    pub fn flag(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(text) = present(value) {
            let value = parse_flag(Some(text)).map_or_else(|| Value::from(text), Value::Bool);
            self.arguments.insert(key.to_string(), value);
        }
        self
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// The user's request and the assistant's tool call
    pub fn messages(&self) -> Vec<PromptMessage> {
        let arguments = Value::Object(self.arguments.clone());
        vec![
            PromptMessage::new_text(PromptMessageRole::User, format!("{}.", self.request)),
            PromptMessage::new_text(
                PromptMessageRole::Assistant,
                format!(
                    "I'll call the `{}` tool with these arguments:\n```json\n{:#}\n```",
                    self.tool, arguments
                ),
            ),
        ]
    }

    pub fn build(self, description: impl Into<String>) -> GetPromptResult {
        GetPromptResult {
            description: Some(description.into()),
            messages: self.messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;
    use serde_json::json;

    fn texts(result: &GetPromptResult) -> Vec<&str> {
        result
            .messages
            .iter()
            .map(|message| match &message.content {
                PromptMessageContent::Text { text } => text.as_str(),
                other => panic!("unexpected content {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_request_and_tool_call() {
        let result = ToolCallPrompt::new("google_search", "I want to search Google for 'rust'")
            .described("location", Some("Austin, Texas"), |v| format!("from {}", v))
            .described("gl", Some("  "), |v| format!("in {}", v))
            .integer("num", Some("5"))
            .flag("readable_json", Some("yes"))
            .build("Search Google");

        assert_eq!(result.description.as_deref(), Some("Search Google"));
        assert_eq!(result.messages[0].role, PromptMessageRole::User);
        assert_eq!(result.messages[1].role, PromptMessageRole::Assistant);

        let texts = texts(&result);
        assert_eq!(texts[0], "I want to search Google for 'rust' from Austin, Texas.");
        assert!(texts[1].starts_with("I'll call the `google_search` tool"));
        assert!(texts[1].contains("\"num\": 5"));
        assert!(texts[1].contains("\"readable_json\": true"));
        assert!(!texts[1].contains("\"gl\""));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(Some(" Yes ")), Some(true));
        assert_eq!(parse_flag(Some("0")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(Some("")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn test_unparsable_values_pass_through() {
        let prompt = ToolCallPrompt::new("t", "x")
            .integer("num", Some("ten"))
            .flag("filter", Some("maybe"))
            .arg("hl", None);
        assert_eq!(
            Value::Object(prompt.arguments().clone()),
            json!({"num": "ten", "filter": "maybe"})
        );
    }
}
