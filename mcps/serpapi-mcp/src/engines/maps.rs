//! Google Maps local results and place details

use search_adapter::render::{items, path, scalar, text, Markdown};
use search_adapter::{
    Constraint, Engine, EngineSchema, FieldDefault, FieldKind, FieldSpec, UnknownFields,
};
use serde_json::Value;

use super::render_pagination;

const SEARCH_TYPES: &[&str] = &["search", "place"];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "q", FieldKind::Text),
    FieldSpec::new("type", "type", FieldKind::Choice(SEARCH_TYPES))
        .default_to(FieldDefault::Text("search")),
    FieldSpec::text("data"),
    FieldSpec::text("place_id"),
    FieldSpec::text("ll"),
    FieldSpec::text("google_domain"),
    FieldSpec::text("hl"),
    FieldSpec::text("gl"),
    FieldSpec::new(
        "start",
        "start",
        FieldKind::Integer {
            min: Some(0),
            max: None,
        },
    ),
];

static CONSTRAINTS: &[Constraint] = &[
    Constraint::When {
        field: "type",
        value: "search",
        any_of: &["query", "place_id"],
    },
    Constraint::When {
        field: "type",
        value: "place",
        any_of: &["data", "place_id"],
    },
];

pub static GOOGLE_MAPS: Engine = Engine {
    schema: EngineSchema {
        tool: "google_maps_search",
        engine: Some("google_maps"),
        endpoint: "/search",
        fields: FIELDS,
        constraints: CONSTRAINTS,
        unknown: UnknownFields::Drop,
    },
    render: render_maps,
};

fn rating(place: &Value) -> Option<String> {
    let rating = text(place, "rating")?;
    Some(match text(place, "reviews") {
        Some(reviews) => format!("{} ({} reviews)", rating, reviews),
        None => rating,
    })
}

/// Opening hours arrive as text, a `{day: hours}` object or a list of them
fn hours(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Object(days)) => days
            .iter()
            .filter_map(|(day, hours)| scalar(hours).map(|h| format!("{}: {}", day, h)))
            .collect(),
        Some(Value::Array(list)) => list.iter().flat_map(|entry| hours(Some(entry))).collect(),
        Some(other) => scalar(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn render_maps(doc: &Value) -> String {
    let mut md = Markdown::new();

    let local = items(doc, "local_results");
    if !local.is_empty() {
        md.heading(1, format!("Local Results ({})", local.len()));
        for (i, place) in local.iter().enumerate() {
            let title = text(place, "title").unwrap_or_else(|| "[No title available]".to_string());
            md.heading(2, format!("{}. {}", i + 1, title));
            md.field("Rating", rating(place));
            md.field("Address", text(place, "address"));
            md.field("Phone", text(place, "phone"));
            let open = text(place, "hours").or_else(|| text_of_hours(place));
            md.field("Hours", open);
            md.field("Price Level", text(place, "price"));
            if let Some(description) = text(place, "description") {
                md.gap().line(description);
            }
            if let Some(website) = text(place, "website") {
                md.gap().field("Website", Some(website));
            }
            md.field("Google Maps Link", text(place, "link"));
            md.field("Place ID", text(place, "place_id"));
        }
    }

    if let Some(place) = doc.get("place_results").filter(|v| v.is_object()) {
        md.heading(1, "Place Details");
        if let Some(title) = text(place, "title") {
            md.heading(2, title);
        }
        md.field("Rating", rating(place));
        md.field("Address", text(place, "address"));
        md.field("Phone", text(place, "phone"));
        md.field("Website", text(place, "website"));
        if let Some(description) = text(place, "description") {
            md.gap().line(description);
        }
        let open = hours(place.get("hours").or_else(|| place.get("operating_hours")));
        if !open.is_empty() {
            md.heading(2, "Hours");
            for line in open {
                md.bullet(line);
            }
        }
    }

    let reviews = match items(doc, "reviews") {
        [] => path(doc, &["place_results", "user_reviews", "most_relevant"])
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        reviews => reviews,
    };
    if !reviews.is_empty() {
        md.heading(1, format!("Reviews ({})", reviews.len()));
        for (i, review) in reviews.iter().enumerate() {
            let user = text(review, "user")
                .or_else(|| text(review, "username"))
                .or_else(|| path(review, &["user", "name"]).and_then(scalar));
            match user {
                Some(user) => md.heading(2, format!("{}. Review by {}", i + 1, user)),
                None => md.heading(2, format!("{}. Anonymous Review", i + 1)),
            };
            md.field("Rating", text(review, "rating").map(|r| format!("{}/5", r)));
            md.field("Date", text(review, "date"));
            if let Some(body) = text(review, "snippet").or_else(|| text(review, "description")) {
                md.gap().line(body);
            }
        }
    }

    render_pagination(&mut md, doc, 1);
    md.finish()
}

/// `operating_hours` flattened to one line for the local result list
fn text_of_hours(place: &Value) -> Option<String> {
    let open = hours(place.get("operating_hours"));
    (!open.is_empty()).then(|| open.join(", "))
}
