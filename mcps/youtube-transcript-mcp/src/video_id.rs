//! Video id extraction from the many shapes of YouTube links

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::error::{TranscriptError, TranscriptResult};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

/// Path prefixes that are followed directly by the id
const ID_PATHS: &[&str] = &["embed", "v", "shorts", "live", "e"];

/// Resolve a bare id or any watch/short/embed/shorts/live URL to the
/// 11-character video id.
pub fn parse_video_id(input: &str) -> TranscriptResult<String> {
    let input = input.trim();
    if VIDEO_ID.is_match(input) {
        return Ok(input.to_string());
    }

    let invalid = || TranscriptError::InvalidVideoId(input.to_string());

    // Scheme-less links such as "youtu.be/abc" are common in pasted text
    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .map_err(|_| invalid())?;

    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("music."))
        .unwrap_or(&host);

    let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some(prefix) if ID_PATHS.contains(&prefix) => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    };

    candidate
        .filter(|id| VIDEO_ID.is_match(id))
        .ok_or_else(invalid)
}
