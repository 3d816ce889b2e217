//! Google Images

use search_adapter::render::{items, joined, object, scalar, text, Markdown};
use search_adapter::{Constraint, Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;

use super::google::{BINARY, DEVICES, SAFE};

const ASPECT_RATIOS: &[&str] = &["s", "t", "w", "xw"];
const IMAGE_TYPES: &[&str] = &["face", "photo", "clipart", "lineart", "animated"];
const LICENSES: &[&str] = &["f", "fc", "fm", "fmc", "cl", "ol"];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text).required(),
    FieldSpec::text("location"),
    FieldSpec::text("uule"),
    FieldSpec::text("google_domain"),
    FieldSpec::text("gl"),
    FieldSpec::text("hl"),
    FieldSpec::text("cr"),
    FieldSpec::new("device", "device", FieldKind::Choice(DEVICES)),
    FieldSpec::new(
        "page",
        "ijn",
        FieldKind::Integer {
            min: Some(0),
            max: None,
        },
    ),
    FieldSpec::text("chips"),
    FieldSpec::text("tbs"),
    FieldSpec::new("time_period", "tbs", FieldKind::TimePeriod),
    FieldSpec::new("imgar", "imgar", FieldKind::Choice(ASPECT_RATIOS)),
    FieldSpec::text("imgsz"),
    FieldSpec::text("image_color"),
    FieldSpec::new("image_type", "image_type", FieldKind::Choice(IMAGE_TYPES)),
    FieldSpec::new("licenses", "licenses", FieldKind::Choice(LICENSES)),
    FieldSpec::new("safe", "safe", FieldKind::Choice(SAFE)),
    FieldSpec::new("nfpr", "nfpr", BINARY),
    FieldSpec::new("filter", "filter", BINARY),
];

static CONSTRAINTS: &[Constraint] = &[
    Constraint::Excludes {
        field: "location",
        others: &["uule"],
    },
    Constraint::Excludes {
        field: "time_period",
        others: &["tbs"],
    },
];

pub static GOOGLE_IMAGES: Engine = Engine {
    schema: EngineSchema {
        tool: "google_images_search",
        engine: Some("google_images"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: CONSTRAINTS,
        unknown: UnknownFields::Drop,
    },
    render: render_images,
};

/// `- **label**: value`
fn strong_bullet(md: &mut Markdown, label: &str, value: Option<String>) {
    if let Some(value) = value {
        md.bullet(format!("**{}**: {}", label, value));
    }
}

/// Every scalar field of an object as a bold bullet
fn scalar_block(md: &mut Markdown, doc: &Value, key: &str, heading: &str, hidden: &[&str]) {
    let Some(map) = object(doc, key) else {
        return;
    };
    let entries = search_adapter::render::parameters(map, hidden);
    if entries.is_empty() {
        return;
    }
    md.heading(2, heading);
    for (label, value) in entries {
        md.bullet(format!("**{}**: {}", label, value));
    }
}

fn render_images(doc: &Value) -> String {
    let mut md = Markdown::new();
    md.heading(1, "Google Images Results");

    scalar_block(&mut md, doc, "search_parameters", "Search Parameters", &["api_key"]);
    scalar_block(&mut md, doc, "search_information", "Search Information", &[]);

    let suggested = items(doc, "suggested_searches");
    if !suggested.is_empty() {
        md.heading(2, "Suggested Searches");
        for search in suggested {
            let Some(name) = text(search, "name") else {
                continue;
            };
            md.bullet(format!("**{}**", name));
            if let Some(link) = text(search, "link") {
                md.line(format!("  - Link: {}", link));
            }
            if let Some(chips) = text(search, "chips") {
                md.line(format!("  - Chips: {}", chips));
            }
        }
    }

    let images = items(doc, "images_results");
    if !images.is_empty() {
        md.heading(2, format!("Images Results ({})", images.len()));
        for (i, image) in images.iter().enumerate() {
            md.heading(3, format!("Image {}", i + 1));
            strong_bullet(&mut md, "Title", text(image, "title"));
            strong_bullet(&mut md, "Source", text(image, "source"));
            strong_bullet(&mut md, "Link", text(image, "link"));
            strong_bullet(&mut md, "Original Image", text(image, "original"));
            if let (Some(w), Some(h)) = (text(image, "original_width"), text(image, "original_height")) {
                strong_bullet(&mut md, "Dimensions", Some(format!("{}x{}", w, h)));
            }
            strong_bullet(&mut md, "Is Product", image.get("is_product").and_then(scalar));
            strong_bullet(&mut md, "In Stock", image.get("in_stock").and_then(scalar));
            strong_bullet(&mut md, "Tag", text(image, "tag"));
        }
    }

    let related = items(doc, "related_searches");
    if !related.is_empty() {
        md.heading(2, "Related Searches");
        for search in related {
            let Some(query) = text(search, "query") else {
                continue;
            };
            md.bullet(format!("**{}**", query));
            if let Some(words) = joined(search, "highlighted_words", ", ") {
                md.line(format!("  - Highlighted Words: {}", words));
            }
            if let Some(link) = text(search, "link") {
                md.line(format!("  - Link: {}", link));
            }
        }
    }

    scalar_block(&mut md, doc, "serpapi_pagination", "Pagination", &[]);
    md.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_adapter::{map_request, Descriptor};
    use serde_json::json;

    fn map(value: Value) -> search_adapter::AdapterResult<search_adapter::QueryParams> {
        map_request(&GOOGLE_IMAGES.schema, &Descriptor::from_value(value).unwrap(), None)
    }

    #[test]
    fn test_renames() {
        let query = map(json!({
            "query": "ferris",
            "page": 2,
            "time_period": "w",
            "image_type": "clipart",
            "nfpr": true
        }))
        .unwrap();
        assert_eq!(query.get("ijn"), Some("2"));
        assert_eq!(query.get("tbs"), Some("qdr:w"));
        assert_eq!(query.get("image_type"), Some("clipart"));
        assert_eq!(query.get("nfpr"), Some("1"));
    }

    #[test]
    fn test_exclusions() {
        assert!(map(json!({"query": "x", "location": "Austin", "uule": "w+CAIQ"})).is_err());
        assert!(map(json!({"query": "x", "time_period": "d", "tbs": "isz:l"})).is_err());
        assert!(map(json!({"query": "x", "tbs": "isz:l"})).is_ok());
        assert!(map(json!({"query": "x", "imgar": "square"})).is_err());
        assert!(map(json!({"query": "x", "page": -1})).is_err());
    }

    #[test]
    fn test_render() {
        let doc = json!({
            "search_parameters": {"engine": "google_images", "q": "ferris", "api_key": "k"},
            "suggested_searches": [{"name": "crab", "link": "https://s"}],
            "images_results": [{
                "title": "Ferris",
                "source": "rust-lang.org",
                "original": "https://o.png",
                "original_width": 640,
                "original_height": 480,
                "is_product": false
            }],
            "related_searches": [{"query": "rust crab", "highlighted_words": ["crab"]}]
        });
        let out = render_images(&doc);
        assert!(out.starts_with("# Google Images Results\n\n## Search Parameters\n- **engine**: google_images\n- **q**: ferris"));
        assert!(!out.contains("api_key"));
        assert!(out.contains("## Suggested Searches\n- **crab**\n  - Link: https://s"));
        assert!(out.contains("## Images Results (1)\n\n### Image 1\n- **Title**: Ferris\n- **Source**: rust-lang.org"));
        assert!(out.contains("- **Dimensions**: 640x480\n- **Is Product**: false"));
        assert!(out.contains("- **rust crab**\n  - Highlighted Words: crab"));
    }
}
