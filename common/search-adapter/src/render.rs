//! Building blocks for readable renderings
//!
//! Renderers only read optional data through these helpers, so a field the
//! provider left out simply produces no line.

use serde_json::{Map, Value};

/// Line-oriented markdown builder
#[derive(Debug, Default)]
pub struct Markdown {
    lines: Vec<String>,
}

impl Markdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#`-style heading; a blank line separates it from earlier content.
    pub fn heading(&mut self, level: usize, text: impl AsRef<str>) -> &mut Self {
        self.gap();
        self.lines
            .push(format!("{} {}", "#".repeat(level.max(1)), text.as_ref()));
        self
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    /// `label: value` when the value exists
    pub fn field(&mut self, label: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.lines.push(format!("{}: {}", label, value));
        }
        self
    }

    /// `**label:** value` when the value exists
    pub fn strong_field(&mut self, label: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.lines.push(format!("**{}:** {}", label, value));
        }
        self
    }

    /// Indented `label: value` when the value exists
    pub fn detail(&mut self, label: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.lines.push(format!("   {}: {}", label, value));
        }
        self
    }

    pub fn bullet(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("- {}", text.as_ref()));
        self
    }

    /// Blank line, collapsing repeats
    pub fn gap(&mut self) -> &mut Self {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

/// Follow a key path through nested objects
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(key))
}

/// Scalar at `key` as display text; `None` for missing, null, empty or
/// structured values.
pub fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar)
}

/// Scalar at a nested path as display text
pub fn text_at(value: &Value, keys: &[&str]) -> Option<String> {
    path(value, keys).and_then(scalar)
}

pub fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Array at `key`, or an empty slice
pub fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn object<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}

/// Scalars at `key` (a list) joined with `separator`; objects contribute
/// their `name` field.
pub fn joined(value: &Value, key: &str, separator: &str) -> Option<String> {
    let parts: Vec<String> = items(value, key)
        .iter()
        .filter_map(|item| scalar(item).or_else(|| text(item, "name")))
        .collect();
    (!parts.is_empty()).then(|| parts.join(separator))
}

/// Flat `key: value` summary of an object's scalar fields, skipping `hidden`
pub fn parameters(map: &Map<String, Value>, hidden: &[&str]) -> Vec<(String, String)> {
    map.iter()
        .filter(|(k, _)| !hidden.contains(&k.as_str()))
        .filter_map(|(k, v)| scalar(v).map(|v| (k.clone(), v)))
        .collect()
}
