//! Google News

use search_adapter::render::{items, joined, text, Markdown};
use search_adapter::{Constraint, Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;

use super::google::BINARY;
use super::render_pagination;

/// Named Google News topics and their topic tokens
pub const TOPICS: &[(&str, &str)] = &[
    ("Business", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx6TVdZU0FtVnVHZ0pWVXlnQVAB"),
    ("U.S.", "CAAqIggKIhxDQkFTRHdvSkwyMHZNRGxqTjNjd0VnSmxiaWdBUAE"),
    ("World", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pWVXlnQVAB"),
    ("Technology", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGRqTVhZU0FtVnVHZ0pWVXlnQVAB"),
    ("Entertainment", "CAAqJggKIiBDQkFTRWdvSUwyMHZNREpxYW5RU0FtVnVHZ0pWVXlnQVAB"),
    ("Sports", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp1ZEdvU0FtVnVHZ0pWVXlnQVAB"),
    ("Science", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp0Y1RjU0FtVnVHZ0pWVXlnQVAB"),
    ("Health", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNR3QwTlRFU0FtVnVLQUFQAQ"),
    ("Headlines", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRFZxYUdjU0FtVnVHZ0pWVXlnQVAB"),
];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text),
    FieldSpec::text("gl"),
    FieldSpec::text("hl"),
    FieldSpec::new("topic", "topic_token", FieldKind::Lookup(TOPICS)),
    FieldSpec::text("topic_token"),
    FieldSpec::text("publication_token"),
    FieldSpec::text("story_token"),
    FieldSpec::text("section_token"),
    FieldSpec::new("sort_by_date", "so", BINARY),
];

static CONSTRAINTS: &[Constraint] = &[
    Constraint::AnyOf(&[
        "query",
        "topic",
        "topic_token",
        "publication_token",
        "story_token",
        "section_token",
    ]),
    Constraint::Excludes {
        field: "topic",
        others: &["topic_token", "query"],
    },
    Constraint::Excludes {
        field: "topic_token",
        others: &["query"],
    },
    Constraint::Excludes {
        field: "story_token",
        others: &["query"],
    },
    Constraint::Requires {
        field: "sort_by_date",
        any_of: &["story_token"],
    },
    Constraint::Requires {
        field: "section_token",
        any_of: &["topic", "topic_token", "publication_token"],
    },
];

pub static GOOGLE_NEWS: Engine = Engine {
    schema: EngineSchema {
        tool: "google_news_search",
        engine: Some("google_news"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: CONSTRAINTS,
        unknown: UnknownFields::Drop,
    },
    render: render_news,
};

/// Title or link, falling back to the story's `highlight` block
fn story_field(result: &Value, key: &str) -> Option<String> {
    text(result, key).or_else(|| result.get("highlight").and_then(|h| text(h, key)))
}

fn render_news(doc: &Value) -> String {
    let mut md = Markdown::new();

    if let Some(title) = text(doc, "title") {
        md.heading(1, title);
    }

    let results = items(doc, "news_results");
    if !results.is_empty() {
        md.heading(2, "News Results");
        md.gap();
        for (i, result) in results.iter().enumerate() {
            let title = story_field(result, "title")
                .unwrap_or_else(|| "[No title available]".to_string());
            md.line(format!("{}. **{}**", i + 1, title));
            if let Some(source) = result.get("source").and_then(|s| text(s, "name")) {
                let line = match result.get("source").and_then(|s| joined(s, "authors", ", ")) {
                    Some(authors) => format!("Source: {} | Authors: {}", source, authors),
                    None => format!("Source: {}", source),
                };
                md.line(line);
            }
            md.field("Date", text(result, "date"));
            if let Some(snippet) = text(result, "snippet") {
                md.line(snippet);
            }
            md.field("Link", story_field(result, "link"));
            let stories = items(result, "stories");
            if !stories.is_empty() {
                md.line(format!("Related coverage: {} stories", stories.len()));
            }
            md.gap();
        }
    } else {
        md.heading(2, "No News Results Found");
    }

    for (key, heading) in [
        ("related_topics", "Related Topics"),
        ("related_publications", "Related Publications"),
    ] {
        let entries: Vec<String> = items(doc, key)
            .iter()
            .filter_map(|entry| text(entry, "title"))
            .collect();
        if !entries.is_empty() {
            md.heading(2, heading);
            for entry in entries {
                md.bullet(entry);
            }
        }
    }

    render_pagination(&mut md, doc, 2);
    md.finish()
}
