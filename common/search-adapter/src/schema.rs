//! Declarative engine schemas
//!
//! An [`EngineSchema`] lists the public fields a tool accepts, how each one
//! is coerced onto the provider's wire name, and the cross-field rules the
//! request must satisfy. Schemas are plain `static` data; all behavior lives
//! in [`crate::mapper`].

use serde_json::Value;

/// What to do with descriptor keys the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFields {
    /// Forward scalar values under their own name
    PassThrough,
    /// Ignore them
    Drop,
}

/// How a field's value is checked and encoded
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text; numbers and booleans are stringified
    Text,
    /// One of a fixed set, matched case-insensitively
    Choice(&'static [&'static str]),
    /// Whole number within optional bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// Boolean encoded as provider tokens
    Flag { on: &'static str, off: &'static str },
    /// List of strings joined by `separator`
    List {
        separator: &'static str,
        max_items: Option<usize>,
    },
    /// Relative time window (`d`, `w3`, `m6`, ...) encoded as `qdr:<v>`
    TimePeriod,
    /// Friendly name looked up in a `(name, token)` table
    Lookup(&'static [(&'static str, &'static str)]),
    /// Domain list folded into another text field as `site:` operators
    SiteFilter { into: &'static str, exclude: bool },
}

/// Value used when a field is absent
#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    Integer(i64),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Integer(n) => Value::from(n),
            FieldDefault::Text(s) => Value::from(s),
        }
    }
}

/// One public field of an engine
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Name in the request descriptor
    pub name: &'static str,
    /// Name in the provider's query string
    pub wire: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    /// Optional text field forwarded under the same name
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, name, FieldKind::Text)
    }

    pub const fn new(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            required: false,
            default: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_to(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// Rule spanning several fields, checked after defaults are applied
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// At least one of the fields must be present
    AnyOf(&'static [&'static str]),
    /// When `field` is present none of `others` may be
    Excludes {
        field: &'static str,
        others: &'static [&'static str],
    },
    /// When `field` is present at least one of `any_of` must be
    Requires {
        field: &'static str,
        any_of: &'static [&'static str],
    },
    /// When `field` equals `value`, at least one of `any_of` must be present
    When {
        field: &'static str,
        value: &'static str,
        any_of: &'static [&'static str],
    },
    /// Two integer fields may not add up past `limit`
    SumAtMost {
        fields: (&'static str, &'static str),
        limit: i64,
    },
    /// `earlier` may not be greater than `later`
    NotAfter {
        earlier: &'static str,
        later: &'static str,
    },
}

/// Everything the mapper needs to know about one remote engine
#[derive(Debug, Clone, Copy)]
pub struct EngineSchema {
    /// Public tool name
    pub tool: &'static str,
    /// Value of the provider's `engine` parameter, when it takes one
    pub engine: Option<&'static str>,
    /// Path appended to the transport's base URL
    pub endpoint: &'static str,
    pub fields: &'static [FieldSpec],
    pub constraints: &'static [Constraint],
    pub unknown: UnknownFields,
}

impl EngineSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is the wire name of any declared field
    pub fn is_wire_name(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.wire == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldSpec] = &[
        FieldSpec::new("query", "q", FieldKind::Text).required(),
        FieldSpec::new(
            "num",
            "num",
            FieldKind::Integer {
                min: Some(1),
                max: Some(100),
            },
        )
        .default_to(FieldDefault::Integer(10)),
    ];

    static SCHEMA: EngineSchema = EngineSchema {
        tool: "test_search",
        engine: Some("test"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    };

    #[test]
    fn test_const_builders() {
        let query = SCHEMA.field("query").unwrap();
        assert!(query.required);
        assert_eq!(query.wire, "q");
        assert!(matches!(
            SCHEMA.field("num").unwrap().default,
            Some(FieldDefault::Integer(10))
        ));
        assert!(SCHEMA.field("q").is_none());
        assert!(SCHEMA.is_wire_name("q"));
    }
}
