//! YouTube Transcript MCP Library
//!
//! Captions fetched straight from YouTube: the watch page supplies the
//! innertube key, the player endpoint lists caption tracks, and the chosen
//! track's timed-text XML becomes a list of segments.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use youtube_transcript_mcp::{Config, YoutubeTranscriptMcpServer};
//!
//! let server = YoutubeTranscriptMcpServer::new(&Config::load()?)?;
//! let result = server
//!     .call_tool(
//!         "youtube_transcript",
//!         serde_json::json!({"video_url": "https://youtu.be/dQw4w9WgXcQ", "text_transcript": true}),
//!     )
//!     .await?;
//! ```

pub mod config;
pub mod cookies;
pub mod error;
pub mod format;
pub mod server;
pub mod source;
pub mod timedtext;
pub mod track;
pub mod transcript;
pub mod video_id;

pub use config::Config;
pub use error::{TranscriptError, TranscriptResult};
pub use server::YoutubeTranscriptMcpServer;
pub use source::{FetchOptions, TranscriptSource, YouTubeClient};

// Re-export parameter types for direct API usage
pub use server::{ListTranscriptsParams, TranscriptParams, TranscriptPromptArgs};
