//! SerpAPI engines
//!
//! Each engine is a declarative [`EngineSchema`](search_adapter::EngineSchema)
//! plus a readable renderer. The server hands them to the shared
//! [`Adapter`](search_adapter::Adapter); nothing here does I/O.

use search_adapter::render::{items, object, scalar, text, Markdown};
use search_adapter::Engine;
use serde_json::Value;

pub mod finance;
pub mod google;
pub mod images;
pub mod maps;
pub mod news;
pub mod scholar;
pub mod trends;
pub mod youtube;

pub use finance::GOOGLE_FINANCE;
pub use google::{GOOGLE_LOCATIONS, GOOGLE_SEARCH, SERPAPI_ACCOUNT};
pub use images::GOOGLE_IMAGES;
pub use maps::GOOGLE_MAPS;
pub use news::GOOGLE_NEWS;
pub use scholar::GOOGLE_SCHOLAR;
pub use trends::GOOGLE_TRENDS;
pub use youtube::{YOUTUBE_SEARCH, YOUTUBE_VIDEO};

/// Every engine the server exposes, in tool-list order
pub static ALL: &[&Engine] = &[
    &GOOGLE_SEARCH,
    &GOOGLE_LOCATIONS,
    &SERPAPI_ACCOUNT,
    &GOOGLE_NEWS,
    &GOOGLE_SCHOLAR,
    &GOOGLE_TRENDS,
    &GOOGLE_FINANCE,
    &GOOGLE_MAPS,
    &GOOGLE_IMAGES,
    &YOUTUBE_SEARCH,
    &YOUTUBE_VIDEO,
];

/// Look an engine up by its tool name
pub fn by_tool(tool: &str) -> Option<&'static Engine> {
    ALL.iter().copied().find(|engine| engine.tool() == tool)
}

/// `- [query](link)` list shared by several engines
pub(crate) fn render_related_searches(md: &mut Markdown, doc: &Value, level: usize) {
    let related = items(doc, "related_searches");
    if related.is_empty() {
        return;
    }
    md.heading(level, "Related Searches");
    for search in related {
        let Some(query) = text(search, "query") else {
            continue;
        };
        match text(search, "link") {
            Some(link) => md.bullet(format!("[{}]({})", query, link)),
            None => md.bullet(query),
        };
    }
}

/// Pagination block; prefers SerpAPI's own `serpapi_pagination` links
pub(crate) fn render_pagination(md: &mut Markdown, doc: &Value, level: usize) {
    let pagination = doc
        .get("serpapi_pagination")
        .or_else(|| doc.get("pagination"))
        .filter(|p| p.is_object());
    let Some(pagination) = pagination else {
        return;
    };
    md.heading(level, "Pagination");
    md.field("Current Page", text(pagination, "current"));
    md.field("Next Page", text(pagination, "next").or_else(|| text(pagination, "next_link")));
    md.field("Next Page Token", text(pagination, "next_page_token"));
    let others = match pagination.get("other_pages") {
        Some(Value::Object(map)) => map.keys().cloned().collect::<Vec<_>>(),
        Some(Value::Array(list)) => list.iter().filter_map(scalar).collect(),
        _ => Vec::new(),
    };
    if !others.is_empty() {
        md.field("Other Pages", Some(others.join(", ")));
    }
}

/// `Search Parameters` block with the listed keys hidden
pub(crate) fn render_parameters(md: &mut Markdown, doc: &Value, hidden: &[&str]) {
    let Some(params) = object(doc, "search_parameters") else {
        return;
    };
    let params = search_adapter::render::parameters(params, hidden);
    if params.is_empty() {
        return;
    }
    md.heading(2, "Search Parameters");
    for (key, value) in params {
        md.bullet(format!("{}: {}", key, value));
    }
}
