//! Result envelope: structured document plus the means to render it

use serde_json::{Map, Value};
use std::fmt;

use crate::descriptor::Descriptor;
use crate::error::AdapterResult;
use crate::transport::Document;

/// Renders the readable form of a document
pub type RenderFn = fn(&Value) -> String;

/// How the envelope is turned into tool output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The provider body, byte for byte
    #[default]
    Raw,
    /// JSON with nulls and empty values pruned
    Clean,
    /// Engine-specific markdown
    Readable,
}

impl OutputMode {
    /// Resolve the mode from request flags; `raw` wins, then `readable`,
    /// then `clean`. No flag means raw.
    pub fn select(raw: bool, readable: bool, clean: bool) -> Self {
        if raw {
            OutputMode::Raw
        } else if readable {
            OutputMode::Readable
        } else if clean {
            OutputMode::Clean
        } else {
            OutputMode::Raw
        }
    }

    pub fn from_descriptor(descriptor: &Descriptor) -> AdapterResult<Self> {
        Ok(Self::select(
            descriptor.flag("raw_json")?,
            descriptor.flag("readable_json")?,
            descriptor.flag("clean_json")?,
        ))
    }
}

/// One call's result. Built per call and dropped once rendered.
#[derive(Clone)]
pub struct Envelope {
    document: Document,
    render: RenderFn,
    mode: OutputMode,
}

impl Envelope {
    pub fn new(document: Document, render: RenderFn, mode: OutputMode) -> Self {
        Self {
            document,
            render,
            mode,
        }
    }

    pub fn document(&self) -> &Value {
        self.document.value()
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// The provider body exactly as received
    pub fn raw(&self) -> &str {
        self.document.body()
    }

    pub fn cleaned(&self) -> Value {
        clean_json(self.document.value()).unwrap_or(Value::Null)
    }

    pub fn readable(&self) -> String {
        (self.render)(self.document.value())
    }

    /// Render according to the selected mode
    pub fn output(&self) -> String {
        match self.mode {
            OutputMode::Raw => self.raw().to_string(),
            OutputMode::Clean => serde_json::to_string_pretty(&self.cleaned())
                .unwrap_or_else(|_| self.cleaned().to_string()),
            OutputMode::Readable => self.readable(),
        }
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("document", &self.document)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Recursively drop nulls, empty strings, empty lists and empty objects.
///
/// Returns `None` when nothing is left.
pub fn clean_json(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let kept: Vec<Value> = items.iter().filter_map(clean_json).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| clean_json(v).map(|v| (k.clone(), v)))
                .collect();
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        other => Some(other.clone()),
    }
}
