//! Request descriptor: the flat parameter mapping handed to an adapter

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};

/// Keys that select the output mode; never forwarded to a provider.
pub const OUTPUT_FLAGS: &[&str] = &["raw_json", "readable_json", "clean_json", "text_transcript"];

/// Keys the adapter injects itself; callers may not set them.
pub const RESERVED_KEYS: &[&str] = &["api_key", "engine"];

/// Flat mapping from parameter name to a scalar or small list.
///
/// Nulls and empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    fields: Map<String, Value>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a descriptor from any serializable parameter struct.
    pub fn from_params<T: Serialize>(params: &T) -> AdapterResult<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| AdapterError::validation("parameters", e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a descriptor from a JSON object.
    pub fn from_value(value: Value) -> AdapterResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::default()),
            other => Err(AdapterError::validation(
                "parameters",
                format!("expected an object, got {}", type_name(&other)),
            )),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .filter(|(_, value)| !is_absent(value))
            .collect();
        Self { fields }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        let key = key.into();
        if is_absent(&value) {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Read a boolean flag; absent means false, non-booleans are rejected.
    pub fn flag(&self, key: &str) -> AdapterResult<bool> {
        match self.fields.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(AdapterError::validation(
                key,
                format!("expected a boolean, got {}", type_name(other)),
            )),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// A list parameter as callers actually send it: a JSON list, or a string
/// holding a JSON list or comma-separated items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ListParam {
    List(Vec<String>),
    Text(String),
}

impl ListParam {
    pub fn items(&self) -> Vec<String> {
        match self {
            ListParam::List(items) => clean_items(items.iter().map(String::as_str)),
            ListParam::Text(text) => split_list(text),
        }
    }
}

/// Split a list written as a JSON array string or comma-separated text.
pub fn split_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return clean_items(items.iter().map(String::as_str));
        }
    }
    clean_items(trimmed.split(','))
}

fn clean_items<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_and_blank_strings_are_absent() {
        let descriptor =
            Descriptor::from_value(json!({"query": "rust", "gl": null, "hl": "  ", "num": 5}))
                .unwrap();
        assert_eq!(descriptor.len(), 2);
        assert!(descriptor.contains("query"));
        assert!(!descriptor.contains("gl"));
        assert!(!descriptor.contains("hl"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Descriptor::from_value(json!(["rust"])).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn test_flag_reading() {
        let descriptor = Descriptor::new()
            .with("readable_json", true)
            .with("raw_json", "yes");
        assert!(descriptor.flag("readable_json").unwrap());
        assert!(!descriptor.flag("clean_json").unwrap());
        assert!(descriptor.flag("raw_json").is_err());
    }

    #[test]
    fn test_list_param_forms() {
        let list: ListParam = serde_json::from_value(json!(["a.com", " b.com "])).unwrap();
        assert_eq!(list.items(), vec!["a.com", "b.com"]);

        let comma: ListParam = serde_json::from_value(json!("a.com, b.com,")).unwrap();
        assert_eq!(comma.items(), vec!["a.com", "b.com"]);

        let json_text: ListParam = serde_json::from_value(json!("[\"a.com\",\"b.com\"]")).unwrap();
        assert_eq!(json_text.items(), vec!["a.com", "b.com"]);
    }
}
