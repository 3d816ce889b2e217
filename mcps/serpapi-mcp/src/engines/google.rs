//! Google web search, location lookup and account status

use search_adapter::render::{items, object, scalar, text, Markdown};
use search_adapter::{
    Constraint, Engine, EngineSchema, FieldDefault, FieldKind, FieldSpec, UnknownFields,
};
use serde_json::Value;

use super::{render_pagination, render_related_searches};

pub(crate) const DEVICES: &[&str] = &["desktop", "tablet", "mobile"];
pub(crate) const SAFE: &[&str] = &["active", "off"];
pub(crate) const BINARY: FieldKind = FieldKind::Flag { on: "1", off: "0" };

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
    FieldSpec::text("location"),
    FieldSpec::text("gl"),
    FieldSpec::text("hl"),
    FieldSpec::new("device", "device", FieldKind::Choice(DEVICES)),
    FieldSpec::new("safe", "safe", FieldKind::Choice(SAFE)),
    FieldSpec::new("filter", "filter", BINARY),
    FieldSpec::new("time_period", "tbs", FieldKind::TimePeriod),
    FieldSpec::new("exact_terms", "exactTerms", FieldKind::Text),
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

pub static GOOGLE_SEARCH: Engine = Engine {
    schema: EngineSchema {
        tool: "google_search",
        engine: Some("google"),
        endpoint: "/search",
        fields: SEARCH_FIELDS,
        constraints: &[Constraint::SumAtMost {
            fields: ("start", "num"),
            limit: 100,
        }],
        unknown: UnknownFields::PassThrough,
    },
    render: render_search,
};

static LOCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text).required(),
    FieldSpec::new(
        "limit",
        "limit",
        FieldKind::Integer {
            min: Some(1),
            max: Some(1000),
        },
    ),
];

pub static GOOGLE_LOCATIONS: Engine = Engine {
    schema: EngineSchema {
        tool: "google_locations",
        engine: None,
        endpoint: "/locations.json",
        fields: LOCATION_FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_locations,
};

pub static SERPAPI_ACCOUNT: Engine = Engine {
    schema: EngineSchema {
        tool: "serpapi_account",
        engine: None,
        endpoint: "/account.json",
        fields: &[],
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_account,
};

fn render_search(doc: &Value) -> String {
    let mut md = Markdown::new();

    if let Some(info) = doc.get("search_information").filter(|v| v.is_object()) {
        md.heading(1, "Search Information");
        md.field("Total Results", text(info, "total_results"));
        md.field("Time Taken", text(info, "time_taken_displayed"));
    }

    let organic = items(doc, "organic_results");
    if !organic.is_empty() {
        md.heading(1, format!("Organic Results ({})", organic.len()));
        for (i, result) in organic.iter().enumerate() {
            let title = text(result, "title").unwrap_or_else(|| "[No title]".to_string());
            md.heading(2, format!("{}. {}", i + 1, title));
            md.field("Link", text(result, "link"));
            md.field("Displayed Link", text(result, "displayed_link"));
            if let Some(snippet) = text(result, "snippet") {
                md.gap().line(snippet);
            }
            md.field("Date", text(result, "date"));
            render_sitelinks(&mut md, result);
        }
    }

    if let Some(graph) = doc.get("knowledge_graph").filter(|v| v.is_object()) {
        md.heading(1, "Knowledge Graph");
        if let Some(title) = text(graph, "title") {
            md.heading(2, title);
        }
        md.field("Type", text(graph, "type"));
        if let Some(description) = text(graph, "description") {
            md.gap().line(description);
        }
        md.field("Source", text_link(graph.get("source")));
    }

    if let Some(answer) = doc.get("answer_box").filter(|v| v.is_object()) {
        md.heading(1, "Answer Box");
        if let Some(title) = text(answer, "title") {
            md.heading(2, title);
        }
        if let Some(body) = text(answer, "answer").or_else(|| text(answer, "snippet")) {
            md.line(body);
        }
        if let Some(source) = text(answer, "source") {
            let link = text(answer, "link").unwrap_or_else(|| "#".to_string());
            md.gap().line(format!("Source: [{}]({})", source, link));
        }
    }

    let questions = items(doc, "related_questions");
    if !questions.is_empty() {
        md.heading(1, "People Also Ask");
        for (i, question) in questions.iter().enumerate() {
            let heading = text(question, "question").unwrap_or_else(|| format!("Question {}", i + 1));
            md.heading(2, heading);
            if let Some(snippet) = text(question, "snippet") {
                md.line(snippet);
            }
            md.field("Source", text(question, "link"));
        }
    }

    let stories = items(doc, "top_stories");
    if !stories.is_empty() {
        md.heading(1, format!("Top Stories ({})", stories.len()));
        for (i, story) in stories.iter().enumerate() {
            let title = text(story, "title").unwrap_or_else(|| format!("Story {}", i + 1));
            md.heading(2, format!("{}. {}", i + 1, title));
            md.field("Link", text(story, "link"));
            md.field("Source", text(story, "source"));
            md.field("Date", text(story, "date"));
        }
    }

    render_related_searches(&mut md, doc, 1);
    render_pagination(&mut md, doc, 1);
    md.finish()
}

fn render_sitelinks(md: &mut Markdown, result: &Value) {
    let Some(sitelinks) = result.get("sitelinks") else {
        return;
    };
    let inline = items(sitelinks, "inline");
    let expanded = items(sitelinks, "expanded");
    if inline.is_empty() && expanded.is_empty() {
        return;
    }
    md.gap().line("Sitelinks:");
    for link in inline.iter().chain(expanded) {
        let title = text(link, "title").unwrap_or_else(|| "Link".to_string());
        let href = text(link, "link").unwrap_or_else(|| "#".to_string());
        md.bullet(format!("[{}]({})", title, href));
        if let Some(description) = text(link, "description") {
            md.line(format!("  {}", description));
        }
    }
}

/// `source` is either a plain string or `{name, link}`
fn text_link(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(plain) = scalar(value) {
        return Some(plain);
    }
    let name = text(value, "name")?;
    Some(match text(value, "link") {
        Some(link) => format!("[{}]({})", name, link),
        None => name,
    })
}

fn render_locations(doc: &Value) -> String {
    let mut md = Markdown::new();
    md.line("Available Google Search Locations:");
    for location in doc.as_array().map(Vec::as_slice).unwrap_or(&[]) {
        let name = text(location, "name").unwrap_or_else(|| "Unknown".to_string());
        let canonical = text(location, "canonical_name").unwrap_or_else(|| "Unknown".to_string());
        md.bullet(format!("{} ({})", name, canonical));
        if let Some(code) = text(location, "country_code") {
            md.line(format!("  Country Code: {}", code));
        }
        if let Some(kind) = text(location, "target_type") {
            md.line(format!("  Type: {}", kind));
        }
    }
    md.finish()
}

fn render_account(doc: &Value) -> String {
    let mut md = Markdown::new();
    md.line("SerpAPI Account Information:");
    md.field("Account ID", text(doc, "account_id"));
    md.field("Email", text(doc, "account_email"));
    md.field("Plan", text(doc, "plan_name"));
    md.field("Searches Per Month", text(doc, "searches_per_month"));
    md.field("Searches Left", text(doc, "plan_searches_left"));
    md.field("This Month Usage", text(doc, "this_month_usage"));
    md.field("Hourly Rate Limit", text(doc, "account_rate_limit_per_hour"));
    if let Some(extra) = object(doc, "extra_credits").filter(|m| !m.is_empty()) {
        md.field("Extra Credits", Some(extra.len().to_string()));
    }
    md.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_adapter::{map_request, Credential, Descriptor};
    use serde_json::json;

    fn organic(n: usize) -> Value {
        let results: Vec<Value> = (1..=n)
            .map(|i| {
                json!({
                    "position": i,
                    "title": format!("Climate solution {}", i),
                    "link": format!("https://example.org/{}", i),
                    "displayed_link": "example.org",
                    "snippet": "Ways to cut emissions.",
                    "thumbnail": null
                })
            })
            .collect();
        json!({
            "search_metadata": {"id": "abc", "status": "Success"},
            "search_information": {"total_results": 123000, "time_taken_displayed": 0.41},
            "organic_results": results
        })
    }

    #[test]
    fn test_readable_lists_each_result_once() {
        let out = render_search(&organic(5));
        assert_eq!(out.matches("\nLink: ").count(), 5);
        for i in 1..=5 {
            assert!(out.contains(&format!("## {}. Climate solution {}", i, i)));
            assert!(out.contains(&format!("Link: https://example.org/{}", i)));
        }
        assert!(out.contains("# Organic Results (5)"));
        assert!(out.contains("Total Results: 123000"));
        for key in ["organic_results", "search_metadata", "displayed_link", "{", "\"position\""] {
            assert!(!out.contains(key), "leaked {key}");
        }
    }

    #[test]
    fn test_sparse_sections() {
        let doc = json!({
            "organic_results": [{"title": "Only title"}],
            "knowledge_graph": {"title": "Rust", "source": {"name": "Wikipedia", "link": "https://w"}},
            "answer_box": {"snippet": "A language"},
            "related_questions": [{}],
            "top_stories": [{"link": "https://news"}],
            "related_searches": [{"query": "rust book"}, {}]
        });
        let out = render_search(&doc);
        assert!(out.contains("## 1. Only title"));
        assert!(!out.contains("Displayed Link"));
        assert!(out.contains("Source: [Wikipedia](https://w)"));
        assert!(out.contains("A language"));
        assert!(out.contains("## Question 1"));
        assert!(out.contains("## 1. Story 1"));
        assert!(out.contains("- rust book"));
    }

    #[test]
    fn test_sitelinks() {
        let doc = json!({"organic_results": [{
            "title": "Docs",
            "sitelinks": {
                "inline": [{"title": "Book", "link": "https://b"}],
                "expanded": [{"title": "Std", "link": "https://s", "description": "Standard library"}]
            }
        }]});
        let out = render_search(&doc);
        assert!(out.contains("Sitelinks:\n- [Book](https://b)\n- [Std](https://s)\n  Standard library"));
    }

    #[test]
    fn test_search_schema_mapping() {
        let key = Credential::new("k").unwrap();
        let descriptor = Descriptor::from_value(json!({
            "query": "climate change solutions",
            "num": 5,
            "time_period": "m",
            "exact_terms": "carbon capture",
            "filter": false,
            "nfpr": "1"
        }))
        .unwrap();
        let query = map_request(&GOOGLE_SEARCH.schema, &descriptor, Some(&key)).unwrap();
        assert_eq!(query.get("engine"), Some("google"));
        assert_eq!(query.get("q"), Some("climate change solutions"));
        assert_eq!(query.get("num"), Some("5"));
        assert_eq!(query.get("tbs"), Some("qdr:m"));
        assert_eq!(query.get("exactTerms"), Some("carbon capture"));
        assert_eq!(query.get("filter"), Some("0"));
        assert_eq!(query.get("nfpr"), Some("1"));
    }

    #[test]
    fn test_num_above_bound_rejected() {
        let descriptor = Descriptor::new().with("query", "rust").with("num", 101);
        let err = map_request(&GOOGLE_SEARCH.schema, &descriptor, None).unwrap_err();
        assert!(err.to_string().contains("num"));
    }

    #[test]
    fn test_locations_and_account() {
        let locations = json!([
            {"name": "Austin", "canonical_name": "Austin,Texas,United States", "country_code": "US", "target_type": "City"},
            {"name": "Paris"}
        ]);
        let out = render_locations(&locations);
        assert!(out.starts_with("Available Google Search Locations:"));
        assert!(out.contains("- Austin (Austin,Texas,United States)\n  Country Code: US\n  Type: City"));
        assert!(out.contains("- Paris (Unknown)"));

        let account = json!({"account_id": "42", "api_key": "secret", "plan_name": "Free", "plan_searches_left": 99});
        let out = render_account(&account);
        assert!(out.contains("Account ID: 42"));
        assert!(out.contains("Searches Left: 99"));
        assert!(!out.contains("secret"));
    }

    #[test]
    fn test_account_takes_no_parameters() {
        let key = Credential::new("k").unwrap();
        let query = map_request(&SERPAPI_ACCOUNT.schema, &Descriptor::new(), Some(&key)).unwrap();
        assert_eq!(query.pairs().len(), 1);
        assert_eq!(query.get("api_key"), Some("k"));
    }
}
