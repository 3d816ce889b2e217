//! YouTube search and video details

use search_adapter::render::{items, scalar, text, text_at, Markdown};
use search_adapter::{Engine, EngineSchema, FieldKind, FieldSpec, UnknownFields};
use serde_json::Value;


static SEARCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("query", "search_query", FieldKind::Text).required(),
    FieldSpec::text("gl"),
    FieldSpec::text("hl"),
    FieldSpec::text("sp"),
];

pub static YOUTUBE_SEARCH: Engine = Engine {
    schema: EngineSchema {
        tool: "youtube_search",
        engine: Some("youtube"),
        endpoint: "/search",
        fields: SEARCH_FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_search,
};

static VIDEO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("video_id", "v", FieldKind::Text).required(),
    FieldSpec::text("gl"),
    FieldSpec::text("hl"),
    FieldSpec::text("next_page_token"),
];

pub static YOUTUBE_VIDEO: Engine = Engine {
    schema: EngineSchema {
        tool: "youtube_video",
        engine: Some("youtube_video"),
        endpoint: "/search",
        fields: VIDEO_FIELDS,
        constraints: &[],
        unknown: UnknownFields::Drop,
    },
    render: render_video,
};

/// `     Label: value` under a numbered entry
fn indented(md: &mut Markdown, label: &str, value: Option<String>) {
    if let Some(value) = value {
        md.line(format!("     {}: {}", label, value));
    }
}

/// Thumbnails are either a URL or `{static, rich}`
fn thumbnail(entry: &Value) -> Option<String> {
    let thumb = entry.get("thumbnail")?;
    scalar(thumb).or_else(|| text(thumb, "static"))
}

fn channel_name(entry: &Value) -> Option<String> {
    text_at(entry, &["channel", "name"]).or_else(|| text(entry, "channel"))
}

/// `Heading (n):` followed by numbered entries
fn numbered<F>(md: &mut Markdown, heading: &str, entries: &[Value], mut entry: F)
where
    F: FnMut(&mut Markdown, &Value),
{
    if entries.is_empty() {
        return;
    }
    md.gap().line(format!("{} ({}):", heading, entries.len()));
    for (i, value) in entries.iter().enumerate() {
        md.line(format!("  {}. {}", i + 1, title_of(value)));
        entry(md, value);
        md.gap();
    }
}

fn title_of(entry: &Value) -> String {
    text(entry, "title")
        .or_else(|| text(entry, "name"))
        .unwrap_or_else(|| "[Untitled]".to_string())
}

fn render_search(doc: &Value) -> String {
    let mut md = Markdown::new();

    if let Some(total) = text_at(doc, &["search_information", "total_results"]) {
        md.line("Search Information:");
        md.line(format!("  Total Results: {}", total));
    }

    numbered(&mut md, "Video Results", items(doc, "video_results"), |md, video| {
        indented(md, "Link", text(video, "link"));
        indented(md, "Channel", channel_name(video));
        indented(md, "Published", text(video, "published_date"));
        indented(md, "Views", text(video, "views"));
        indented(md, "Length", text(video, "length"));
        indented(md, "Thumbnail", thumbnail(video));
        indented(md, "Description", text(video, "description"));
    });

    numbered(&mut md, "Channel Results", items(doc, "channel_results"), |md, channel| {
        indented(md, "Link", text(channel, "link"));
        indented(md, "Subscribers", text(channel, "subscribers"));
    });

    numbered(&mut md, "Playlist Results", items(doc, "playlist_results"), |md, playlist| {
        indented(md, "Link", text(playlist, "link"));
        indented(md, "Videos", text(playlist, "video_count"));
    });

    // Shorts come grouped as `[{shorts: [...]}]` or flat
    let shorts: Vec<Value> = items(doc, "shorts_results")
        .iter()
        .flat_map(|group| match group.get("shorts").and_then(Value::as_array) {
            Some(list) => list.clone(),
            None => vec![group.clone()],
        })
        .collect();
    numbered(&mut md, "Shorts Results", &shorts, |md, short| {
        indented(md, "Link", text(short, "link"));
        indented(md, "Views", text(short, "views"));
    });

    let related: Vec<String> = items(doc, "related_searches")
        .iter()
        .filter_map(|r| text(r, "query"))
        .collect();
    if !related.is_empty() {
        md.gap().line("Related Searches:");
        for (i, query) in related.iter().enumerate() {
            md.line(format!("  {}. {}", i + 1, query));
        }
    }

    md.finish()
}

fn render_video(doc: &Value) -> String {
    let mut md = Markdown::new();

    let info = doc
        .get("video_information")
        .filter(|v| v.is_object())
        .unwrap_or(doc);
    if text(info, "title").is_some() {
        md.line("Video Information:");
        md.field("  Title", text(info, "title"));
        md.field("  Channel", channel_name(info));
        md.field("  Views", text(info, "views").or_else(|| text(info, "extracted_views")));
        md.field("  Likes", text(info, "likes").or_else(|| text(info, "extracted_likes")));
        md.field(
            "  Published",
            text(info, "published_date").or_else(|| text(info, "upload_date")),
        );
        md.field("  Length", text(info, "length"));
    }

    let description = text_at(doc, &["description", "content"])
        .or_else(|| text(doc, "description"))
        .or_else(|| text_at(doc, &["video_details", "description"]));
    if let Some(description) = description {
        md.gap().line("Description:");
        md.line(format!("  {}", description));
    }

    numbered(&mut md, "Related Videos", items(doc, "related_videos"), |md, video| {
        indented(md, "Link", text(video, "link"));
        indented(md, "Channel", channel_name(video));
        indented(md, "Views", text(video, "views"));
        indented(md, "Length", text(video, "length"));
        indented(md, "Thumbnail", thumbnail(video));
    });

    let comments = items(doc, "comments");
    if !comments.is_empty() {
        md.gap().line(format!("Comments ({}):", comments.len()));
        for (i, comment) in comments.iter().enumerate() {
            let author = channel_name(comment)
                .or_else(|| text_at(comment, &["author", "name"]))
                .unwrap_or_else(|| "Unknown User".to_string());
            md.line(format!("  {}. {}:", i + 1, author));
            if let Some(body) = text(comment, "content").or_else(|| text(comment, "text")) {
                md.line(format!("     {}", body));
            }
            indented(&mut md, "Likes", text(comment, "likes"));
            indented(&mut md, "Published", text(comment, "published_date"));
            md.gap();
        }
    }

    md.finish()
}
