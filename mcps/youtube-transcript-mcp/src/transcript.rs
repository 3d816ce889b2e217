//! From a video reference to timed segments

use search_adapter::split_list;

use crate::error::TranscriptResult;
use crate::source::{FetchOptions, TranscriptSource};
use crate::timedtext::Segment;
use crate::track::{Track, TrackList};
use crate::video_id::parse_video_id;

/// One transcript request after validation
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    pub video_id: String,
    /// Language codes in priority order
    pub languages: Vec<String>,
    pub fallback_to_any: bool,
    pub options: FetchOptions,
}

impl TranscriptRequest {
    /// `language` is a comma list; blank falls back to `default_language`.
    pub fn new(
        video: &str,
        language: Option<&str>,
        default_language: &str,
        options: FetchOptions,
    ) -> TranscriptResult<Self> {
        let video_id = parse_video_id(video)?;
        let mut languages = language.map(split_list).unwrap_or_default();
        if languages.is_empty() {
            languages = split_list(default_language);
        }
        Ok(Self {
            video_id,
            languages,
            fallback_to_any: false,
            options,
        })
    }

    pub fn with_fallback(mut self, fallback_to_any: bool) -> Self {
        self.fallback_to_any = fallback_to_any;
        self
    }
}

/// A downloaded transcript
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub track: Track,
    pub segments: Vec<Segment>,
}

/// List tracks, pick one, download it
pub async fn fetch_transcript(
    source: &dyn TranscriptSource,
    request: &TranscriptRequest,
) -> TranscriptResult<Transcript> {
    let tracks = source.list(&request.video_id, &request.options).await?;
    let track = tracks
        .select(&request.languages, request.fallback_to_any)?
        .clone();

    tracing::debug!(
        source = source.name(),
        video_id = %request.video_id,
        language = %track.language_code,
        generated = track.is_generated,
        "Fetching transcript"
    );
    let segments = source
        .fetch(&request.video_id, &track, &request.options)
        .await?;

    Ok(Transcript {
        video_id: request.video_id.clone(),
        track,
        segments,
    })
}

/// Every track of a video
pub async fn list_tracks(
    source: &dyn TranscriptSource,
    video: &str,
    options: &FetchOptions,
) -> TranscriptResult<TrackList> {
    let video_id = parse_video_id(video)?;
    source.list(&video_id, options).await
}
