//! YouTube Transcript MCP Server
//!
//! Serves `youtube_transcript` and `list_transcripts` over stdio. No API key
//! is needed.

use youtube_transcript_mcp::{Config, YoutubeTranscriptMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::load_dotenv(None);
    mcp_common::init_tracing("youtube_transcript_mcp")?;

    tracing::info!("Starting YouTube Transcript MCP Server");

    let config = Config::load()?;
    let server = YoutubeTranscriptMcpServer::new(&config)?;

    mcp_common::serve_stdio(server).await
}
