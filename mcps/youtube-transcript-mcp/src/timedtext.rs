//! Timed-text caption XML

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

use crate::error::{TranscriptError, TranscriptResult};

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?\s*([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid regex"));

/// Inline tags kept when formatting is preserved
const FORMATTING_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "mark", "small", "del", "ins", "sub", "sup",
];

/// One caption line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    /// Seconds from the start of the video
    pub start: f64,
    /// Seconds on screen
    pub duration: f64,
}

/// Parse `<transcript><text start=".." dur="..">..</text>..</transcript>`.
///
/// Entities are decoded twice (the XML layer, then the HTML escaping
/// YouTube applies inside it) and markup is stripped unless
/// `preserve_formatting` keeps the inline formatting tags.
pub fn parse_timed_text(xml: &str, preserve_formatting: bool) -> TranscriptResult<Vec<Segment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"text" => {
                let (start, duration) = timing(&element)?;
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Text(content)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    let content = content.unescape().map_err(unparsable)?;
                    text.push_str(&content);
                }
            }
            Ok(Event::CData(content)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Ok(Event::End(element)) if element.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = clean_text(&raw, preserve_formatting);
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(unparsable(err)),
        }
    }

    Ok(segments)
}

fn timing(element: &BytesStart<'_>) -> TranscriptResult<(f64, f64)> {
    let mut start = None;
    let mut duration = 0.0;
    for attribute in element.attributes() {
        let attribute = attribute.map_err(unparsable)?;
        let value = attribute.unescape_value().map_err(unparsable)?;
        match attribute.key.as_ref() {
            b"start" => start = value.parse::<f64>().ok(),
            b"dur" => duration = value.parse::<f64>().unwrap_or(0.0),
            _ => {}
        }
    }
    let start = start.ok_or_else(|| {
        TranscriptError::Unparsable("caption line without a start time".to_string())
    })?;
    Ok((start, duration))
}

fn clean_text(raw: &str, preserve_formatting: bool) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let stripped = TAG.replace_all(&decoded, |caps: &Captures<'_>| {
        let name = caps[1].to_ascii_lowercase();
        if preserve_formatting && FORMATTING_TAGS.contains(&name.as_str()) {
            caps[0].to_string()
        } else {
            String::new()
        }
    });
    stripped.trim().to_string()
}

fn unparsable(err: impl std::fmt::Display) -> TranscriptError {
    TranscriptError::Unparsable(format!("caption XML: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0.5" dur="1.54">Hey there</text>
<text start="2.04" dur="3">how&amp;#39;s it &amp;lt;b&amp;gt;going&amp;lt;/b&amp;gt;</text>
<text start="5.1" dur="0.5"></text>
<text start="5.6">[Music] &amp;amp; more</text>
</transcript>"#;

    #[test]
    fn test_parse_segments() {
        let segments = parse_timed_text(XML, false).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            Segment {
                text: "Hey there".into(),
                start: 0.5,
                duration: 1.54
            }
        );
        assert_eq!(segments[1].text, "how's it going");
        assert_eq!(segments[2].text, "[Music] & more");
        assert_eq!(segments[2].duration, 0.0);
    }

    #[test]
    fn test_preserve_formatting() {
        let segments = parse_timed_text(XML, true).unwrap();
        assert_eq!(segments[1].text, "how's it <b>going</b>");
    }

    #[test]
    fn test_strip_unknown_tags_even_when_preserving() {
        assert_eq!(clean_text("<font color=\"#fff\">hi</font> <i>there</i>", true), "hi <i>there</i>");
        assert_eq!(clean_text("<font color=\"#fff\">hi</font> <i>there</i>", false), "hi there");
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let err = parse_timed_text("<transcript><text dur=\"1\">x</text></transcript>", false).unwrap_err();
        assert!(matches!(err, TranscriptError::Unparsable(_)));
    }

    #[test]
    fn test_empty_transcript() {
        assert!(parse_timed_text("<transcript></transcript>", false).unwrap().is_empty());
    }
}
