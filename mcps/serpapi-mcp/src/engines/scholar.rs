//! Google Scholar

use search_adapter::render::{items, joined, path, text, text_at, Markdown};
use search_adapter::{Constraint, Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;

use super::google::{BINARY, SAFE};
use super::{render_pagination, render_parameters, render_related_searches};

const YEAR: FieldKind = FieldKind::Integer {
    min: Some(1000),
    max: None,
};

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text),
    FieldSpec::text("cites"),
    FieldSpec::text("cluster"),
    FieldSpec::text("hl"),
    FieldSpec::new(
        "lr",
        "lr",
        FieldKind::List {
            separator: "|",
            max_items: None,
        },
    ),
    FieldSpec::new(
        "start",
        "start",
        FieldKind::Integer {
            min: Some(0),
            max: None,
        },
    ),
    FieldSpec::new(
        "num",
        "num",
        FieldKind::Integer {
            min: Some(1),
            max: Some(20),
        },
    ),
    FieldSpec::new("year_from", "as_ylo", YEAR),
    FieldSpec::new("year_to", "as_yhi", YEAR),
    FieldSpec::new(
        "scisbd",
        "scisbd",
        FieldKind::Integer {
            min: Some(0),
            max: Some(2),
        },
    ),
    FieldSpec::text("as_sdt"),
    FieldSpec::new("safe", "safe", FieldKind::Choice(SAFE)),
    FieldSpec::new("filter", "filter", BINARY),
    FieldSpec::new("exclude_citations", "as_vis", BINARY),
    FieldSpec::new("review_articles_only", "as_rr", BINARY),
];

static CONSTRAINTS: &[Constraint] = &[
    Constraint::AnyOf(&["query", "cites", "cluster"]),
    Constraint::Excludes {
        field: "cluster",
        others: &["query", "cites"],
    },
    Constraint::NotAfter {
        earlier: "year_from",
        later: "year_to",
    },
];

pub static GOOGLE_SCHOLAR: Engine = Engine {
    schema: EngineSchema {
        tool: "google_scholar_search",
        engine: Some("google_scholar"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: CONSTRAINTS,
        unknown: UnknownFields::Drop,
    },
    render: render_scholar,
};

fn render_scholar(doc: &Value) -> String {
    let mut md = Markdown::new();
    md.heading(1, "Google Scholar Search Results");

    if let Some(info) = doc.get("search_information") {
        md.strong_field("Total Results", text(info, "total_results"));
        md.strong_field("Time Taken", text(info, "time_taken_displayed"));
    }

    render_parameters(&mut md, doc, &["engine", "api_key"]);

    let results = items(doc, "organic_results");
    if !results.is_empty() {
        md.heading(2, "Results");
        for (i, result) in results.iter().enumerate() {
            let title = text(result, "title").unwrap_or_else(|| "[No title]".to_string());
            md.heading(3, format!("{}. {}", i + 1, title));
            if let Some(snippet) = text(result, "snippet") {
                md.line(snippet);
            }

            if let Some(info) = result.get("publication_info") {
                let mut parts = Vec::new();
                if let Some(summary) = text(info, "summary") {
                    parts.push(format!("**Publication:** {}", summary));
                }
                if let Some(authors) = joined(info, "authors", ", ") {
                    parts.push(format!("**Authors:** {}", authors));
                }
                if !parts.is_empty() {
                    md.line(parts.join(" | "));
                }
            }

            md.strong_field("Year", text(result, "year"));
            md.strong_field("Journal", text(result, "journal"));

            let cited_by = path(result, &["inline_links", "cited_by"]).or_else(|| result.get("cited_by"));
            if let Some(cited_by) = cited_by {
                let count = text(cited_by, "total").or_else(|| text(cited_by, "value"));
                if let Some(count) = count {
                    let line = match text(cited_by, "link") {
                        Some(link) => format!("[{}]({})", count, link),
                        None => count,
                    };
                    md.strong_field("Cited by", Some(line));
                }
            }

            if let Some(link) = text(result, "link") {
                md.strong_field("Link", Some(format!("[{}]({})", link, link)));
            }

            let resources: Vec<String> = items(result, "resources")
                .iter()
                .filter_map(|r| {
                    let title = text(r, "title")?;
                    let link = text(r, "link")?;
                    Some(match text(r, "file_format") {
                        Some(format) => format!("[{}]({}) ({})", title, link, format),
                        None => format!("[{}]({})", title, link),
                    })
                })
                .collect();
            if !resources.is_empty() {
                md.line("**Resources:**");
                for resource in resources {
                    md.bullet(resource);
                }
            }

            md.gap().line("---");
        }
    }

    md.field("Author profiles", text_at(doc, &["profiles", "link"]));

    render_related_searches(&mut md, doc, 2);
    render_pagination(&mut md, doc, 2);
    md.finish()
}
