//! SerpAPI MCP Library
//!
//! Google web, news, scholar, trends, finance, maps and images search plus
//! YouTube search and video details, each exposed as one MCP tool with a
//! matching guided prompt.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use serpapi_mcp::{Config, SerpApiMcpServer};
//!
//! let server = SerpApiMcpServer::new(&Config::load()?)?;
//! let result = server
//!     .call_tool("google_search", serde_json::json!({"query": "rust", "readable_json": true}))
//!     .await?;
//! ```
//!
//! # Configuration
//! Set `SERPAPI_KEY` (or `SERP_API_KEY`), or configure in `~/.serp-tools/serpapi.toml`

pub mod config;
pub mod engines;
pub mod prompts;
pub mod server;

pub use config::Config;
pub use server::SerpApiMcpServer;

// Re-export parameter types for direct API usage
pub use server::{
    AccountParams, FinanceSearchParams, GoogleSearchParams, ImagesSearchParams, LocationsParams,
    MapsSearchParams, NewsSearchParams, ScholarSearchParams, TrendsSearchParams,
    YoutubeSearchParams, YoutubeVideoParams,
};
