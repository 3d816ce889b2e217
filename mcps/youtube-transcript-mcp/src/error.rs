//! Transcript retrieval errors

use mcp_common::{failure, FailureClass, IntoMcpError, McpError};
use search_adapter::AdapterError;
use thiserror::Error;

/// Everything that can stop a transcript from being returned
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("not a YouTube video id or URL: {0}")]
    InvalidVideoId(String),

    #[error("invalid option '{field}': {reason}")]
    InvalidOption { field: String, reason: String },

    #[error("could not use cookie file {path}: {reason}")]
    Cookies { path: String, reason: String },

    #[error("video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error(
        "no transcript in {} for video {video_id}; available: {}",
        listed(.requested),
        listed(.available)
    )]
    LanguageUnavailable {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("video {0} is age restricted; pass cookies_path with a signed-in session")]
    AgeRestricted(String),

    #[error("YouTube is blocking requests for video {0} (bot check or captcha)")]
    RequestBlocked(String),

    #[error("video {video_id} is unplayable: {reason}")]
    Unplayable { video_id: String, reason: String },

    #[error("could not accept YouTube's cookie consent for video {0}")]
    Consent(String),

    #[error("unexpected YouTube response: {0}")]
    Unparsable(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl TranscriptError {
    pub fn invalid_option(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TranscriptError::InvalidOption {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            TranscriptError::InvalidVideoId(_)
            | TranscriptError::InvalidOption { .. }
            | TranscriptError::Cookies { .. } => FailureClass::Validation,
            TranscriptError::VideoUnavailable(_)
            | TranscriptError::TranscriptsDisabled(_)
            | TranscriptError::LanguageUnavailable { .. } => FailureClass::NotFound,
            TranscriptError::AgeRestricted(_)
            | TranscriptError::RequestBlocked(_)
            | TranscriptError::Unplayable { .. }
            | TranscriptError::Consent(_)
            | TranscriptError::Unparsable(_) => FailureClass::Provider,
            TranscriptError::Adapter(err) => err.class(),
        }
    }
}

impl IntoMcpError for TranscriptError {
    fn into_mcp_error(self) -> McpError {
        failure(self.class(), self.to_string())
    }
}

impl From<TranscriptError> for McpError {
    fn from(err: TranscriptError) -> Self {
        err.into_mcp_error()
    }
}

pub type TranscriptResult<T> = Result<T, TranscriptError>;

fn listed(codes: &[String]) -> String {
    if codes.is_empty() {
        "none".to_string()
    } else {
        codes.join(", ")
    }
}
