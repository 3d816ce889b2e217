//! Parameter mapper: request descriptor + engine schema -> query parameters

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::descriptor::{split_list, type_name, Descriptor, OUTPUT_FLAGS, RESERVED_KEYS};
use crate::error::{AdapterError, AdapterResult};
use crate::schema::{Constraint, EngineSchema, FieldKind, FieldSpec, UnknownFields};

static TIME_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[hdwmy][0-9]*$").expect("valid regex"));

/// Static API credential sent with every provider request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, rejecting blank values
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Ordered query-string parameters ready for the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Display form with the credential masked, for logs
    pub fn redacted(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                if k == "api_key" {
                    format!("{}=***", k)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn set(&mut self, key: &str, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.push(key, value),
        }
    }
}

/// Map `descriptor` onto the query parameters `schema` describes.
///
/// Validation happens entirely here, so a failure means no request is sent.
/// The credential (if any) and the engine id are appended by the mapper and
/// can never come from the caller.
pub fn map_request(
    schema: &EngineSchema,
    descriptor: &Descriptor,
    credential: Option<&Credential>,
) -> AdapterResult<QueryParams> {
    let values = effective_values(schema, descriptor)?;

    for field in schema.fields.iter().filter(|f| f.required) {
        if !values.contains_key(field.name) {
            return Err(AdapterError::validation(field.name, "is required"));
        }
    }

    for constraint in schema.constraints {
        check_constraint(constraint, &values)?;
    }

    let mut query = QueryParams::new();
    if let Some(engine) = schema.engine {
        query.push("engine", engine);
    }

    let mut site_filters = Vec::new();
    for field in schema.fields {
        let Some(value) = values.get(field.name) else {
            continue;
        };
        if let FieldKind::SiteFilter { .. } = field.kind {
            site_filters.push((field, value));
            continue;
        }
        let encoded = encode(field, value)?;
        if query.contains(field.wire) {
            return Err(AdapterError::validation(
                field.name,
                format!("conflicts with another parameter mapped to '{}'", field.wire),
            ));
        }
        query.push(field.wire, encoded);
    }

    for (field, value) in site_filters {
        apply_site_filter(&mut query, field, value)?;
    }

    if schema.unknown == UnknownFields::PassThrough {
        for (key, value) in descriptor.iter() {
            if is_declared(schema, key) {
                continue;
            }
            if schema.is_wire_name(key) || query.contains(key) {
                return Err(AdapterError::validation(
                    key.as_str(),
                    "collides with a mapped parameter",
                ));
            }
            query.push(key.as_str(), passthrough_scalar(key, value)?);
        }
    }

    if let Some(credential) = credential {
        query.push("api_key", credential.expose());
    }

    tracing::debug!(tool = schema.tool, params = %query.redacted(), "Mapped request");
    Ok(query)
}

fn is_declared(schema: &EngineSchema, key: &str) -> bool {
    schema.field(key).is_some() || OUTPUT_FLAGS.contains(&key)
}

/// Present values after reserved-key checks and defaults
fn effective_values(
    schema: &EngineSchema,
    descriptor: &Descriptor,
) -> AdapterResult<HashMap<&'static str, Value>> {
    for (key, _) in descriptor.iter() {
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(AdapterError::validation(
                key.as_str(),
                "is set by the server and cannot be passed",
            ));
        }
        if !is_declared(schema, key) && schema.unknown == UnknownFields::Drop {
            tracing::debug!(tool = schema.tool, field = %key, "Dropping unknown parameter");
        }
    }

    let mut values = HashMap::new();
    for field in schema.fields {
        let value = descriptor
            .get(field.name)
            .cloned()
            .or_else(|| field.default.map(|d| d.to_value()));
        if let Some(value) = value {
            values.insert(field.name, value);
        }
    }
    Ok(values)
}

fn check_constraint(
    constraint: &Constraint,
    values: &HashMap<&'static str, Value>,
) -> AdapterResult<()> {
    let present = |name: &str| values.contains_key(name);
    match *constraint {
        Constraint::AnyOf(fields) => {
            if !fields.iter().any(|f| present(f)) {
                return Err(AdapterError::validation(
                    fields.join("|"),
                    format!("at least one of {} is required", fields.join(", ")),
                ));
            }
        }
        Constraint::Excludes { field, others } => {
            if present(field) {
                if let Some(other) = others.iter().find(|o| present(o)) {
                    return Err(AdapterError::validation(
                        field,
                        format!("cannot be combined with {}", other),
                    ));
                }
            }
        }
        Constraint::Requires { field, any_of } => {
            if present(field) && !any_of.iter().any(|f| present(f)) {
                return Err(AdapterError::validation(
                    field,
                    format!("requires one of {}", any_of.join(", ")),
                ));
            }
        }
        Constraint::When {
            field,
            value,
            any_of,
        } => {
            let matches = values
                .get(field)
                .and_then(|v| v.as_str())
                .is_some_and(|v| v.eq_ignore_ascii_case(value));
            if matches && !any_of.iter().any(|f| present(f)) {
                return Err(AdapterError::validation(
                    any_of.join("|"),
                    format!(
                        "one of {} is required when {} is '{}'",
                        any_of.join(", "),
                        field,
                        value
                    ),
                ));
            }
        }
        Constraint::SumAtMost {
            fields: (a, b),
            limit,
        } => {
            let (Some(x), Some(y)) = (int_of(values, a), int_of(values, b)) else {
                return Ok(());
            };
            match x.checked_add(y) {
                Some(sum) if sum <= limit => {}
                Some(sum) => {
                    return Err(AdapterError::validation(
                        b,
                        format!("{} + {} must not exceed {}, got {}", a, b, limit, sum),
                    ));
                }
                None => {
                    return Err(AdapterError::validation(
                        b,
                        format!("{} + {} must not exceed {}, got {} + {}", a, b, limit, x, y),
                    ));
                }
            }
        }
        Constraint::NotAfter { earlier, later } => {
            let (Some(x), Some(y)) = (int_of(values, earlier), int_of(values, later)) else {
                return Ok(());
            };
            if x > y {
                return Err(AdapterError::validation(
                    earlier,
                    format!("must not be greater than {} ({} > {})", later, x, y),
                ));
            }
        }
    }
    Ok(())
}

fn int_of(values: &HashMap<&'static str, Value>, name: &str) -> Option<i64> {
    values.get(name).and_then(Value::as_i64)
}

/// Encode one present value according to its field kind
fn encode(field: &FieldSpec, value: &Value) -> AdapterResult<String> {
    let name = field.name;
    match field.kind {
        FieldKind::Text => scalar_text(value).ok_or_else(|| wrong_type(name, "text", value)),
        FieldKind::Choice(options) => {
            let text = value.as_str().ok_or_else(|| wrong_type(name, "text", value))?;
            options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(text.trim()))
                .map(|o| o.to_string())
                .ok_or_else(|| {
                    AdapterError::validation(
                        name,
                        format!("must be one of {}, got '{}'", options.join(", "), text),
                    )
                })
        }
        FieldKind::Integer { min, max } => {
            let n = match value.as_i64() {
                Some(n) => n,
                None if value.is_u64() => {
                    return Err(AdapterError::validation(
                        name,
                        format!("integer out of range, got {}", value),
                    ));
                }
                None => return Err(wrong_type(name, "an integer", value)),
            };
            if let Some(min) = min.filter(|min| n < *min) {
                return Err(AdapterError::validation(
                    name,
                    format!("must be at least {}, got {}", min, n),
                ));
            }
            if let Some(max) = max.filter(|max| n > *max) {
                return Err(AdapterError::validation(
                    name,
                    format!("must be at most {}, got {}", max, n),
                ));
            }
            Ok(n.to_string())
        }
        FieldKind::Flag { on, off } => {
            let enabled = match value {
                Value::Bool(b) => *b,
                Value::String(s) if s.eq_ignore_ascii_case("true") || s == on => true,
                Value::String(s) if s.eq_ignore_ascii_case("false") || s == off => false,
                _ => return Err(wrong_type(name, "a boolean", value)),
            };
            Ok(if enabled { on } else { off }.to_string())
        }
        FieldKind::List {
            separator,
            max_items,
        } => {
            let items = list_items(name, value)?;
            if items.is_empty() {
                return Err(AdapterError::validation(name, "must not be empty"));
            }
            if let Some(max) = max_items.filter(|max| items.len() > *max) {
                return Err(AdapterError::validation(
                    name,
                    format!("accepts at most {} items, got {}", max, items.len()),
                ));
            }
            Ok(items.join(separator))
        }
        FieldKind::TimePeriod => {
            let text = value.as_str().ok_or_else(|| wrong_type(name, "text", value))?;
            let period = text.trim().to_ascii_lowercase();
            if !TIME_PERIOD.is_match(&period) {
                return Err(AdapterError::validation(
                    name,
                    format!("expected h, d, w, m or y with an optional count, got '{}'", text),
                ));
            }
            Ok(format!("qdr:{}", period))
        }
        FieldKind::Lookup(table) => {
            let text = value.as_str().ok_or_else(|| wrong_type(name, "text", value))?;
            table
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(text.trim()))
                .map(|(_, token)| token.to_string())
                .ok_or_else(|| {
                    let names: Vec<&str> = table.iter().map(|(key, _)| *key).collect();
                    AdapterError::validation(
                        name,
                        format!("must be one of {}, got '{}'", names.join(", "), text),
                    )
                })
        }
        FieldKind::SiteFilter { .. } => list_items(name, value).map(|items| items.join(",")),
    }
}

fn apply_site_filter(query: &mut QueryParams, field: &FieldSpec, value: &Value) -> AdapterResult<()> {
    let FieldKind::SiteFilter { into, exclude } = field.kind else {
        return Ok(());
    };
    let domains = list_items(field.name, value)?;
    if domains.is_empty() {
        return Ok(());
    }
    let base = query.get(into).unwrap_or_default().to_string();
    let rewritten = if exclude {
        let terms: Vec<String> = domains.iter().map(|d| format!("-site:{}", d)).collect();
        format!("{} {}", base, terms.join(" ")).trim().to_string()
    } else {
        let sites: Vec<String> = domains.iter().map(|d| format!("site:{}", d)).collect();
        if base.is_empty() {
            sites.join(" OR ")
        } else {
            format!("({}) {}", base, sites.join(" OR "))
        }
    };
    query.set(into, rewritten);
    Ok(())
}

fn list_items(name: &str, value: &Value) -> AdapterResult<Vec<String>> {
    match value {
        Value::String(text) => Ok(split_list(text)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let text = scalar_text(item)
                    .ok_or_else(|| wrong_type(name, "a list of strings", value))?;
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Ok(out)
        }
        other => Err(wrong_type(name, "a list", other)),
    }
}

fn passthrough_scalar(name: &str, value: &Value) -> AdapterResult<String> {
    scalar_text(value).ok_or_else(|| wrong_type(name, "a scalar", value))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn wrong_type(name: &str, expected: &str, value: &Value) -> AdapterError {
    AdapterError::validation(name, format!("expected {}, got {}", expected, type_name(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefault;
    use serde_json::json;

    static SEARCH_FIELDS: &[FieldSpec] = &[
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
        FieldSpec::new(
            "start",
            "start",
            FieldKind::Integer {
                min: Some(0),
                max: None,
            },
        ),
        FieldSpec::new("filter", "filter", FieldKind::Flag { on: "1", off: "0" }),
        FieldSpec::new("device", "device", FieldKind::Choice(&["desktop", "tablet", "mobile"])),
        FieldSpec::new("time_period", "tbs", FieldKind::TimePeriod),
        FieldSpec::new(
            "include_domains",
            "include_domains",
            FieldKind::SiteFilter {
                into: "q",
                exclude: false,
            },
        ),
        FieldSpec::new(
            "exclude_domains",
            "exclude_domains",
            FieldKind::SiteFilter {
                into: "q",
                exclude: true,
            },
        ),
    ];

    static SEARCH: EngineSchema = EngineSchema {
        tool: "web",
        engine: Some("google"),
        endpoint: "/search",
        fields: SEARCH_FIELDS,
        constraints: &[Constraint::SumAtMost {
            fields: ("start", "num"),
            limit: 100,
        }],
        unknown: UnknownFields::PassThrough,
    };

    fn map(value: serde_json::Value) -> AdapterResult<QueryParams> {
        let key = Credential::new("secret").unwrap();
        map_request(&SEARCH, &Descriptor::from_value(value).unwrap(), Some(&key))
    }

    #[test]
    fn test_renames_and_injects_constants() {
        let query = map(json!({"query": "rust"})).unwrap();
        assert_eq!(query.get("engine"), Some("google"));
        assert_eq!(query.get("q"), Some("rust"));
        assert_eq!(query.get("num"), Some("10"));
        assert_eq!(query.get("api_key"), Some("secret"));
        assert!(!query.contains("query"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = map(json!({"num": 5})).unwrap_err();
        assert!(matches!(err, AdapterError::Validation { ref field, .. } if field == "query"));
    }

    #[test]
    fn test_out_of_range_is_rejected_not_clamped() {
        let err = map(json!({"query": "rust", "num": 101})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid parameter 'num': must be at most 100, got 101"
        );
        assert!(map(json!({"query": "rust", "num": 0})).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = map(json!({"query": "rust", "num": "5"})).unwrap_err();
        assert!(err.to_string().contains("expected an integer, got a string"));
        assert!(map(json!({"query": "rust", "num": 5.5})).is_err());
    }

    #[test]
    fn test_flag_tokens_are_stable() {
        for _ in 0..3 {
            assert_eq!(
                map(json!({"query": "rust", "filter": true})).unwrap().get("filter"),
                Some("1")
            );
            assert_eq!(
                map(json!({"query": "rust", "filter": false})).unwrap().get("filter"),
                Some("0")
            );
        }
        assert!(map(json!({"query": "rust", "filter": 1})).is_err());
    }

    #[test]
    fn test_choice_is_canonicalized() {
        let query = map(json!({"query": "rust", "device": "Mobile"})).unwrap();
        assert_eq!(query.get("device"), Some("mobile"));
        assert!(map(json!({"query": "rust", "device": "watch"})).is_err());
    }

    #[test]
    fn test_time_period() {
        let query = map(json!({"query": "rust", "time_period": "w2"})).unwrap();
        assert_eq!(query.get("tbs"), Some("qdr:w2"));
        assert!(map(json!({"query": "rust", "time_period": "fortnight"})).is_err());
    }

    #[test]
    fn test_site_filters_rewrite_query() {
        let query = map(json!({
            "query": "async runtime",
            "include_domains": ["docs.rs", "github.com"],
            "exclude_domains": "reddit.com"
        }))
        .unwrap();
        assert_eq!(
            query.get("q"),
            Some("(async runtime) site:docs.rs OR site:github.com -site:reddit.com")
        );
        assert!(!query.contains("include_domains"));
    }

    #[test]
    fn test_sum_constraint() {
        assert!(map(json!({"query": "rust", "start": 90, "num": 10})).is_ok());
        let err = map(json!({"query": "rust", "start": 95, "num": 10})).unwrap_err();
        assert!(err.to_string().contains("start + num must not exceed 100"));
        // default num applies to the sum as well
        assert!(map(json!({"query": "rust", "start": 95})).is_err());
    }

    #[test]
    fn test_sum_constraint_does_not_overflow() {
        let err = map(json!({"query": "rust", "start": i64::MAX})).unwrap_err();
        assert!(matches!(err, AdapterError::Validation { .. }));
        assert!(err.to_string().contains("start + num must not exceed 100"));

        let err = map(json!({"query": "rust", "start": i64::MAX, "num": i64::MAX})).unwrap_err();
        assert!(matches!(err, AdapterError::Validation { .. }));
    }

    #[test]
    fn test_integer_beyond_i64() {
        let err = map(json!({"query": "rust", "start": u64::MAX})).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("invalid parameter 'start': integer out of range, got {}", u64::MAX)
        );
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let query = map(json!({"query": "rust", "lr": "lang_en", "nfpr": 1})).unwrap();
        assert_eq!(query.get("lr"), Some("lang_en"));
        assert_eq!(query.get("nfpr"), Some("1"));
    }

    #[test]
    fn test_passthrough_cannot_shadow_mapped_names() {
        assert!(map(json!({"query": "rust", "q": "other"})).is_err());
        assert!(map(json!({"query": "rust", "tbs": "qdr:d"})).is_err());
    }

    #[test]
    fn test_reserved_keys_rejected() {
        let err = map(json!({"query": "rust", "api_key": "mine"})).unwrap_err();
        assert!(err.to_string().contains("api_key"));
        assert!(map(json!({"query": "rust", "engine": "bing"})).is_err());
    }

    #[test]
    fn test_output_flags_not_forwarded() {
        let query = map(json!({"query": "rust", "readable_json": true, "raw_json": false})).unwrap();
        assert!(!query.contains("readable_json"));
        assert!(!query.contains("raw_json"));
    }

    #[test]
    fn test_dropped_unknowns() {
        let dropping = EngineSchema {
            unknown: UnknownFields::Drop,
            ..SEARCH
        };
        let descriptor = Descriptor::new().with("query", "rust").with("lr", "lang_en");
        let query = map_request(&dropping, &descriptor, None).unwrap();
        assert!(!query.contains("lr"));
        assert!(!query.contains("api_key"));
    }

    #[test]
    fn test_redacted_hides_key() {
        let query = map(json!({"query": "rust"})).unwrap();
        let shown = query.redacted();
        assert!(shown.contains("api_key=***"));
        assert!(!shown.contains("secret"));
        assert_eq!(format!("{:?}", Credential::new("secret").unwrap()), "Credential(***)");
    }

    #[test]
    fn test_blank_credential_rejected() {
        assert!(Credential::new("   ").is_none());
    }
}
