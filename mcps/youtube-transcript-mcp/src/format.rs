//! Transcript output modes

use search_adapter::clean_json;
use serde::Serialize;
use serde_json::Value;

use crate::timedtext::Segment;

/// `[M:SS]`, or `[H:MM:SS]` from one hour on
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("[{}:{:02}:{:02}]", hours, minutes, secs)
    } else {
        format!("[{}:{:02}]", minutes, secs)
    }
}

/// How a transcript is handed back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranscriptMode {
    /// JSON list of segments
    #[default]
    Segments,
    /// The same list with empty fields removed
    Clean,
    /// One line per segment
    Readable,
    /// All text joined into one string
    Text,
}

impl TranscriptMode {
    /// raw_json > readable_json > text_transcript > clean_json
    pub fn select(raw: bool, readable: bool, text: bool, clean: bool) -> Self {
        if raw {
            TranscriptMode::Segments
        } else if readable {
            TranscriptMode::Readable
        } else if text {
            TranscriptMode::Text
        } else if clean {
            TranscriptMode::Clean
        } else {
            TranscriptMode::Segments
        }
    }
}

/// A segment as returned to the caller
#[derive(Debug, Serialize)]
struct OutputSegment<'a> {
    text: &'a str,
    start: f64,
    duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

pub fn render(segments: &[Segment], mode: TranscriptMode, with_timestamps: bool) -> String {
    match mode {
        TranscriptMode::Segments => {
            serde_json::to_string(&structured(segments, with_timestamps)).unwrap_or_default()
        }
        TranscriptMode::Clean => {
            let value = structured(segments, with_timestamps);
            let cleaned = clean_json(&value).unwrap_or(Value::Array(Vec::new()));
            serde_json::to_string_pretty(&cleaned).unwrap_or_default()
        }
        TranscriptMode::Readable => segments
            .iter()
            .map(|segment| {
                if with_timestamps {
                    format!("{} {}", format_timestamp(segment.start), segment.text)
                } else {
                    segment.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        TranscriptMode::Text => segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn structured(segments: &[Segment], with_timestamps: bool) -> Value {
    let output: Vec<OutputSegment<'_>> = segments
        .iter()
        .map(|segment| OutputSegment {
            text: &segment.text,
            start: segment.start,
            duration: segment.duration,
            timestamp: with_timestamps.then(|| format_timestamp(segment.start)),
        })
        .collect();
    serde_json::to_value(output).unwrap_or(Value::Null)
}
