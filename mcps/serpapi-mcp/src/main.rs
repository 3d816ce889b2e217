//! SerpAPI MCP Server
//!
//! Serves the SerpAPI search tools over stdio.
//!
//! # Configuration
//! Set `SERPAPI_KEY` (or `SERP_API_KEY`), or configure in `~/.serp-tools/serpapi.toml`

use serpapi_mcp::{Config, SerpApiMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::load_dotenv(None);
    mcp_common::init_tracing("serpapi_mcp")?;

    tracing::info!("Starting SerpAPI MCP Server");

    let config = Config::load()?;
    let server = SerpApiMcpServer::new(&config)?;

    if config.server.validate_key_on_startup {
        tracing::info!("Validating SerpAPI key...");
        server
            .validate_key()
            .await
            .map_err(|e| anyhow::anyhow!("SerpAPI key validation failed: {}", e))?;
    }

    mcp_common::serve_stdio(server).await
}
