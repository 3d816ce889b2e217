//! Google Trends

use search_adapter::render::{items, text, text_at, Markdown};
use search_adapter::{Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;

use super::render_parameters;

const DATA_TYPES: &[&str] = &[
    "TIMESERIES",
    "GEO_MAP",
    "GEO_MAP_0",
    "RELATED_TOPICS",
    "RELATED_QUERIES",
];
const PROPERTIES: &[&str] = &["images", "news", "youtube", "froogle"];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "query",
        "q",
        FieldKind::List {
            separator: ",",
            max_items: Some(5),
        },
    )
    .required(),
    FieldSpec::text("geo"),
    FieldSpec::text("date"),
    FieldSpec::new(
        "tz",
        "tz",
        FieldKind::Integer {
            min: Some(-1439),
            max: Some(1439),
        },
    ),
    FieldSpec::new("data_type", "data_type", FieldKind::Choice(DATA_TYPES)),
    FieldSpec::new(
        "cat",
        "cat",
        FieldKind::Integer {
            min: Some(0),
            max: None,
        },
    ),
    FieldSpec::new("gprop", "gprop", FieldKind::Choice(PROPERTIES)),
];

pub static GOOGLE_TRENDS: Engine = Engine {
    schema: EngineSchema {
        tool: "google_trends_search",
        engine: Some("google_trends"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_trends,
};

/// `- query: value` lines for a list of `{query, value}` pairs
fn render_values(md: &mut Markdown, values: &[Value]) {
    for value in values {
        if let (Some(query), Some(amount)) = (text(value, "query"), text(value, "value")) {
            md.bullet(format!("{}: {}", query, amount));
        }
    }
}

fn render_trends(doc: &Value) -> String {
    let mut md = Markdown::new();
    md.heading(1, "Google Trends Results");

    render_parameters(&mut md, doc, &["api_key"]);

    let timeline = doc
        .get("interest_over_time")
        .map(|v| items(v, "timeline_data"))
        .unwrap_or(&[]);
    if !timeline.is_empty() {
        md.heading(2, "Interest Over Time");
        md.heading(3, "Timeline Data");
        for point in timeline {
            if let Some(date) = text(point, "date") {
                md.line(format!("**{}**", date));
            }
            render_values(&mut md, items(point, "values"));
            md.gap();
        }
    }

    match doc.get("interest_by_region") {
        Some(Value::Array(regions)) if !regions.is_empty() => {
            md.heading(2, "Interest by Region");
            for region in regions {
                if let (Some(location), Some(value)) = (text(region, "location"), text(region, "value")) {
                    md.bullet(format!("{}: {}", location, value));
                }
            }
        }
        Some(region) if !items(region, "region_data").is_empty() => {
            md.heading(2, "Interest by Region");
            for item in items(region, "region_data") {
                if let Some(name) = text(item, "region_name") {
                    md.line(format!("**{}**", name));
                    render_values(&mut md, items(item, "values"));
                    md.gap();
                }
            }
        }
        _ => {}
    }

    let breakdown = items(doc, "compared_breakdown_by_region");
    if !breakdown.is_empty() {
        md.heading(2, "Interest by Region");
        for item in breakdown {
            if let Some(name) = text(item, "location") {
                md.line(format!("**{}**", name));
                render_values(&mut md, items(item, "values"));
                md.gap();
            }
        }
    }

    render_ranked(&mut md, doc.get("related_topics"), "Related Topics", "Topics", |topic| {
        text(topic, "topic_title").or_else(|| text_at(topic, &["topic", "title"]))
    });
    render_ranked(&mut md, doc.get("related_queries"), "Related Queries", "Queries", |query| {
        text(query, "query")
    });

    let trending = doc
        .get("trending_searches")
        .map(|v| match v {
            Value::Array(list) => list.as_slice(),
            other => items(other, "trending_searches"),
        })
        .unwrap_or(&[]);
    if !trending.is_empty() {
        md.heading(2, "Trending Searches");
        for search in trending {
            if let Some(title) = text(search, "title").or_else(|| text(search, "query")) {
                md.bullet(title);
            }
            for article in items(search, "articles") {
                if let (Some(title), Some(link)) = (text(article, "title"), text(article, "link")) {
                    md.line(format!("  - [{}]({})", title, link));
                }
            }
        }
    }

    md.finish()
}

/// Rising/top sections of related topics or queries
fn render_ranked(
    md: &mut Markdown,
    section: Option<&Value>,
    heading: &str,
    noun: &str,
    label: fn(&Value) -> Option<String>,
) {
    let Some(section) = section else {
        return;
    };
    let rising = items(section, "rising");
    let top = items(section, "top");
    if rising.is_empty() && top.is_empty() {
        return;
    }
    md.heading(2, heading);
    for (kind, entries) in [("Rising", rising), ("Top", top)] {
        if entries.is_empty() {
            continue;
        }
        md.heading(3, format!("{} {}", kind, noun));
        for entry in entries {
            if let (Some(name), Some(value)) = (label(entry), text(entry, "value")) {
                md.bullet(format!("**{}**: {}", name, value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_adapter::{map_request, Descriptor};
    use serde_json::json;

    fn map(value: Value) -> search_adapter::AdapterResult<search_adapter::QueryParams> {
        map_request(&GOOGLE_TRENDS.schema, &Descriptor::from_value(value).unwrap(), None)
    }

    #[test]
    fn test_query_list() {
        let query = map(json!({"query": ["rust", "go"], "data_type": "timeseries"})).unwrap();
        assert_eq!(query.get("q"), Some("rust,go"));
        assert_eq!(query.get("data_type"), Some("TIMESERIES"));
        assert!(map(json!({"query": "a,b,c,d,e,f"})).is_err());
    }

    #[test]
    fn test_tz_bounds() {
        assert!(map(json!({"query": "rust", "tz": -1439})).is_ok());
        assert!(map(json!({"query": "rust", "tz": 1440})).is_err());
        assert!(map(json!({"query": "rust", "gprop": "web"})).is_err());
    }

    #[test]
    fn test_render_sections() {
        let doc = json!({
            "search_parameters": {"engine": "google_trends", "q": "rust", "api_key": "x"},
            "interest_over_time": {"timeline_data": [
                {"date": "Jan 2024", "values": [{"query": "rust", "value": "80"}]}
            ]},
            "interest_by_region": [{"location": "Norway", "value": "100"}],
            "related_topics": {"rising": [{"topic": {"title": "Cargo"}, "value": "+300%"}]},
            "related_queries": {"top": [{"query": "rust game", "value": 100}]}
        });
        let out = render_trends(&doc);
        assert!(out.contains("- engine: google_trends"));
        assert!(!out.contains("api_key"));
        assert!(out.contains("### Timeline Data\n**Jan 2024**\n- rust: 80"));
        assert!(out.contains("## Interest by Region\n- Norway: 100"));
        assert!(out.contains("### Rising Topics\n- **Cargo**: +300%"));
        assert!(out.contains("### Top Queries\n- **rust game**: 100"));
        assert!(!out.contains("Rising Queries"));
    }
}
