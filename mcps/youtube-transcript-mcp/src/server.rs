//! MCP Server implementation for YouTube transcripts

use anyhow::Result;
use mcp_common::{
    decode_params, json_success, parse_flag, result_text, text_success, EmbeddableError,
    EmbeddableMcp, EmbeddableResult,
};
use rmcp::{
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolResult, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, PromptMessage, PromptMessageRole, ServerCapabilities, ServerInfo,
        Tool,
    },
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
};
use schemars::JsonSchema;
use search_adapter::render::Markdown;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::format::{render, TranscriptMode};
use crate::source::{FetchOptions, TranscriptSource, YouTubeClient};
use crate::track::TrackList;
use crate::transcript::{fetch_transcript, list_tracks, TranscriptRequest};

/// The YouTube transcript MCP Server
#[derive(Clone)]
pub struct YoutubeTranscriptMcpServer {
    source: Arc<dyn TranscriptSource>,
    default_language: String,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptParams {
    /// Video id or any YouTube watch, youtu.be, embed, shorts or live URL
    pub video_url: String,
    /// Language codes in priority order, comma-separated (default "en")
    pub language: Option<String>,
    /// Add [M:SS] timestamps to every segment
    pub with_timestamps: Option<bool>,
    /// Keep inline formatting such as <b> and <i>
    pub preserve_formatting: Option<bool>,
    /// Use any available track when none of the requested languages exist
    pub fallback_to_any: Option<bool>,
    /// Netscape cookies.txt of a signed-in session, for age-restricted videos
    pub cookies_path: Option<String>,
    /// https:// proxy for this call
    pub proxy: Option<String>,
    /// Return the segments as JSON (default)
    pub raw_json: Option<bool>,
    /// Return one line per segment
    pub readable_json: Option<bool>,
    /// Return JSON with empty values removed
    pub clean_json: Option<bool>,
    /// Return the whole transcript as one string
    pub text_transcript: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTranscriptsParams {
    /// Video id or URL
    pub video_url: String,
    pub cookies_path: Option<String>,
    pub proxy: Option<String>,
    /// Return a markdown list instead of JSON
    pub readable_json: Option<bool>,
}

/// Prompt arguments arrive as strings; flags accept true/false, yes/no or 1/0
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptPromptArgs {
    /// Video id or URL
    pub video_url: String,
    /// Language codes in priority order, comma-separated
    pub language: Option<String>,
    pub with_timestamps: Option<String>,
    pub preserve_formatting: Option<String>,
    /// Return one plain string instead of one line per segment
    pub text_transcript: Option<String>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl YoutubeTranscriptMcpServer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = YouTubeClient::new(&config.youtube)?;
        tracing::info!("Using YouTube at {}", client.base_url());
        Ok(Self::with_source(
            Arc::new(client),
            &config.youtube.default_language,
        ))
    }

    /// Server over any transcript source
    pub fn with_source(source: Arc<dyn TranscriptSource>, default_language: &str) -> Self {
        Self {
            source,
            default_language: default_language.to_string(),
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    #[tool(
        description = "Fetch a YouTube video's transcript. Picks the first available language from the priority list, preferring manual captions over auto-generated ones. Output is a JSON segment list by default; readable_json gives one line per segment, text_transcript one plain string."
    )]
    async fn youtube_transcript(
        &self,
        Parameters(params): Parameters<TranscriptParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Transcript: {}", params.video_url);

        let options = FetchOptions::new(
            params.proxy,
            params.cookies_path,
            params.preserve_formatting.unwrap_or(false),
        )?;
        let request = TranscriptRequest::new(
            &params.video_url,
            params.language.as_deref(),
            &self.default_language,
            options,
        )?
        .with_fallback(params.fallback_to_any.unwrap_or(false));

        let transcript = fetch_transcript(self.source.as_ref(), &request).await?;
        tracing::info!(
            video_id = %transcript.video_id,
            language = %transcript.track.language_code,
            segments = transcript.segments.len(),
            "Transcript fetched"
        );

        let mode = TranscriptMode::select(
            params.raw_json.unwrap_or(false),
            params.readable_json.unwrap_or(false),
            params.text_transcript.unwrap_or(false),
            params.clean_json.unwrap_or(false),
        );
        Ok(text_success(render(
            &transcript.segments,
            mode,
            params.with_timestamps.unwrap_or(false),
        )))
    }

    #[tool(
        description = "List a YouTube video's caption tracks: language, code, whether auto-generated, whether translatable, and the translation languages."
    )]
    async fn list_transcripts(
        &self,
        Parameters(params): Parameters<ListTranscriptsParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = FetchOptions::new(params.proxy, params.cookies_path, false)?;
        let tracks = list_tracks(self.source.as_ref(), &params.video_url, &options).await?;

        if params.readable_json.unwrap_or(false) {
            Ok(text_success(render_tracks(&tracks)))
        } else {
            json_success(&tracks)
        }
    }
}

impl YoutubeTranscriptMcpServer {
    /// Fetch the transcript and hand it to the user as prompt text
    async fn transcript_prompt(&self, args: TranscriptPromptArgs) -> Result<GetPromptResult, McpError> {
        let text_transcript = parse_flag(args.text_transcript.as_deref()).unwrap_or(false);
        let params = TranscriptParams {
            video_url: args.video_url.clone(),
            language: args.language,
            with_timestamps: parse_flag(args.with_timestamps.as_deref()),
            preserve_formatting: parse_flag(args.preserve_formatting.as_deref()),
            readable_json: Some(!text_transcript),
            text_transcript: Some(text_transcript),
            ..Default::default()
        };
        let result = self.youtube_transcript(Parameters(params)).await?;
        let transcript = result_text(&result).unwrap_or_default();

        Ok(GetPromptResult {
            description: Some(format!("Transcript of YouTube video {}", args.video_url)),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                format!(
                    "Here is the transcript of the YouTube video {}:\n\n{}",
                    args.video_url, transcript
                ),
            )],
        })
    }
}

// ============================================================================
// Prompt Router Implementation
// ============================================================================

#[prompt_router]
impl YoutubeTranscriptMcpServer {
    /// A video's transcript as ready-to-use prompt text
    #[prompt(name = "youtube_transcript_prompt")]
    async fn youtube_transcript_prompt(
        &self,
        Parameters(args): Parameters<TranscriptPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.transcript_prompt(args).await
    }
}

fn render_tracks(list: &TrackList) -> String {
    let mut md = Markdown::new();
    md.heading(1, format!("Transcripts for {}", list.video_id));

    for (heading, generated) in [("Manually Created", false), ("Generated", true)] {
        let tracks: Vec<_> = list
            .tracks
            .iter()
            .filter(|t| t.is_generated == generated)
            .collect();
        if tracks.is_empty() {
            continue;
        }
        md.heading(2, format!("{} ({})", heading, tracks.len()));
        for track in tracks {
            let translatable = if track.is_translatable { " [translatable]" } else { "" };
            md.bullet(format!("{} ({}){}", track.language_code, track.language, translatable));
        }
    }

    if !list.translation_languages.is_empty() {
        md.heading(2, format!("Translation Languages ({})", list.translation_languages.len()));
        for lang in &list.translation_languages {
            md.bullet(format!("{} ({})", lang.language_code, lang.language));
        }
    }
    md.finish()
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
#[prompt_handler]
impl rmcp::ServerHandler for YoutubeTranscriptMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "YouTube Transcript MCP Server - fetch captions for any public video by id \
                 or URL, with language priority, timestamps, and plain-text output. \
                 youtube_transcript_prompt returns a transcript as prompt text."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Embeddable Implementation
// ============================================================================

#[mcp_common::async_trait]
impl EmbeddableMcp for YoutubeTranscriptMcpServer {
    fn server_name(&self) -> &str {
        "youtube-transcript"
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "youtube_transcript" => {
                let params = decode_params(name, params)?;
                self.youtube_transcript(Parameters(params)).await.map_err(Into::into)
            }
            "list_transcripts" => {
                let params = decode_params(name, params)?;
                self.list_transcripts(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }
}
