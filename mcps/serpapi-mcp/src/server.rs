//! MCP Server implementation for SerpAPI
//!
//! Every tool is a typed parameter struct in front of one engine from
//! [`crate::engines`]. The structs only give MCP clients a schema to work
//! with; validation, renaming and the request itself belong to the shared
//! [`Adapter`].

use anyhow::Result;
use mcp_common::{decode_params, text_success, EmbeddableError, EmbeddableMcp, EmbeddableResult};
use rmcp::{
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolResult, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
};
use schemars::JsonSchema;
use search_adapter::{Adapter, AdapterResult, Descriptor, Engine, HttpTransport, ListParam};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::engines::{
    GOOGLE_FINANCE, GOOGLE_IMAGES, GOOGLE_LOCATIONS, GOOGLE_MAPS, GOOGLE_NEWS, GOOGLE_SCHOLAR,
    GOOGLE_SEARCH, GOOGLE_TRENDS, SERPAPI_ACCOUNT, YOUTUBE_SEARCH, YOUTUBE_VIDEO,
};
use crate::prompts::{
    self, AccountPromptArgs, FinancePromptArgs, GoogleSearchPromptArgs, ImagesPromptArgs,
    LocationsPromptArgs, MapsPromptArgs, NewsPromptArgs, ScholarPromptArgs, TrendsPromptArgs,
    YoutubeSearchPromptArgs, YoutubeVideoPromptArgs,
};

/// The SerpAPI MCP Server
#[derive(Clone)]
pub struct SerpApiMcpServer {
    adapter: Adapter,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GoogleSearchParams {
    /// Search query; supports the usual Google operators
    pub query: String,
    /// Number of results, 1-100 (default 10)
    pub num: Option<i64>,
    /// Result offset; start + num may not exceed 100
    pub start: Option<i64>,
    /// Location the search should originate from, e.g. "Austin, Texas"
    pub location: Option<String>,
    /// Two-letter country code
    pub gl: Option<String>,
    /// Two-letter interface language code
    pub hl: Option<String>,
    /// desktop, tablet or mobile
    pub device: Option<String>,
    /// active or off
    pub safe: Option<String>,
    /// Enable Google's similar/omitted result filter
    pub filter: Option<bool>,
    /// Restrict to a recent window: h, d, w, m or y, optionally followed by a count (e.g. "m6")
    pub time_period: Option<String>,
    /// Words or phrases every result must contain
    pub exact_terms: Option<String>,
    /// Only return results from these domains
    pub include_domains: Option<ListParam>,
    /// Never return results from these domains
    pub exclude_domains: Option<ListParam>,
    /// Return the provider's JSON unchanged (default)
    pub raw_json: Option<bool>,
    /// Return a markdown rendering instead of JSON
    pub readable_json: Option<bool>,
    /// Return JSON with null and empty values removed
    pub clean_json: Option<bool>,
    /// Any other SerpAPI Google parameter, passed through as given
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LocationsParams {
    /// Location name to look up, e.g. "Austin"
    pub query: String,
    /// Maximum number of locations, 1-1000
    pub limit: Option<i64>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct AccountParams {
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewsSearchParams {
    /// Search query; cannot be combined with topic, topic_token or story_token
    pub query: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Named topic: Business, U.S., World, Technology, Entertainment, Sports, Science, Health or Headlines
    pub topic: Option<String>,
    #[schemars(description = "Raw topic token from a previous Google News response")]
    pub topic_token: Option<String>,
    #[schemars(description = "Publication token from a previous Google News response")]
    pub publication_token: Option<String>,
    #[schemars(description = "Full coverage token for a single story")]
    pub story_token: Option<String>,
    #[schemars(description = "Section within a topic or publication")]
    pub section_token: Option<String>,
    /// Sort a story's full coverage by date; needs story_token
    pub sort_by_date: Option<bool>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScholarSearchParams {
    /// Search query; one of query, cites or cluster is required
    pub query: Option<String>,
    /// Article id whose citing documents should be listed
    pub cites: Option<String>,
    /// Article id whose versions should be listed; used alone
    pub cluster: Option<String>,
    pub hl: Option<String>,
    /// Language restrictions such as lang_en, as a list
    pub lr: Option<ListParam>,
    pub start: Option<i64>,
    /// Number of results, 1-20
    pub num: Option<i64>,
    /// Earliest publication year
    pub year_from: Option<i64>,
    /// Latest publication year
    pub year_to: Option<i64>,
    /// 0 by relevance, 1 abstracts sorted by date, 2 everything sorted by date
    pub scisbd: Option<i64>,
    /// Patent and case-law selector
    pub as_sdt: Option<String>,
    pub safe: Option<String>,
    pub filter: Option<bool>,
    /// Leave citations out of the results
    pub exclude_citations: Option<bool>,
    /// Only return review articles
    pub review_articles_only: Option<bool>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TrendsSearchParams {
    /// Up to 5 search terms, as a list or comma-separated
    pub query: ListParam,
    /// Region code, e.g. "US" or "US-NY"
    pub geo: Option<String>,
    /// Time range such as "today 12-m" or "2024-01-01 2024-06-30"
    pub date: Option<String>,
    /// Time zone offset in minutes, -1439 to 1439
    pub tz: Option<i64>,
    /// TIMESERIES, GEO_MAP, GEO_MAP_0, RELATED_TOPICS or RELATED_QUERIES
    pub data_type: Option<String>,
    /// Category id
    pub cat: Option<i64>,
    /// Property filter: images, news, youtube or froogle
    pub gprop: Option<String>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct FinanceSearchParams {
    /// Ticker with exchange (e.g. "GOOGL:NASDAQ"), index or currency pair
    pub query: String,
    pub hl: Option<String>,
    /// Graph window: 1D, 5D, 1M, 6M, YTD, 1Y, 5Y or MAX
    pub window: Option<String>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct MapsSearchParams {
    /// Search query; needed for type=search unless place_id is given
    pub query: Option<String>,
    /// search (default) or place
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    /// Place filter; needed for type=place unless place_id is given
    pub data: Option<String>,
    pub place_id: Option<String>,
    /// GPS origin as "@lat,long,zoom", e.g. "@40.7455096,-74.0083012,14z"
    pub ll: Option<String>,
    pub google_domain: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    /// Result offset, in steps of 20
    pub start: Option<i64>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ImagesSearchParams {
    pub query: String,
    /// Location name; cannot be combined with uule
    pub location: Option<String>,
    /// Encoded location; cannot be combined with location
    pub uule: Option<String>,
    pub google_domain: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Country restriction, e.g. "countryUS"
    pub cr: Option<String>,
    pub device: Option<String>,
    /// Results page, starting at 0
    pub page: Option<i64>,
    /// Chip filter from a previous response's suggested searches
    pub chips: Option<String>,
    /// Raw advanced search parameters; cannot be combined with time_period
    pub tbs: Option<String>,
    /// h, d, w, m or y, optionally followed by a count
    pub time_period: Option<String>,
    /// Aspect ratio: s, t, w or xw
    pub imgar: Option<String>,
    pub imgsz: Option<String>,
    pub image_color: Option<String>,
    /// face, photo, clipart, lineart or animated
    pub image_type: Option<String>,
    /// Usage rights: f, fc, fm, fmc, cl or ol
    pub licenses: Option<String>,
    pub safe: Option<String>,
    /// Exclude results from auto-corrected queries
    pub nfpr: Option<bool>,
    pub filter: Option<bool>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeSearchParams {
    pub query: String,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Filter or pagination token
    pub sp: Option<String>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeVideoParams {
    /// 11-character video id
    pub video_id: String,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Token for the next page of related videos or comments
    pub next_page_token: Option<String>,
    pub raw_json: Option<bool>,
    pub readable_json: Option<bool>,
    pub clean_json: Option<bool>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl SerpApiMcpServer {
    pub fn new(config: &Config) -> Result<Self> {
        let credential = config.credential()?;
        let transport = HttpTransport::new(config.http_settings())?;
        tracing::info!("Using SerpAPI at {}", transport.base_url());
        Ok(Self::with_adapter(Adapter::new(Arc::new(transport), credential)))
    }

    /// Server over an already-built adapter
    pub fn with_adapter(adapter: Adapter) -> Self {
        Self {
            adapter,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Call the account endpoint once to prove the key works
    pub async fn validate_key(&self) -> AdapterResult<()> {
        let envelope = self.adapter.invoke(&SERPAPI_ACCOUNT, Descriptor::new()).await?;
        let account = envelope.document();
        tracing::info!(
            plan = account.get("plan_name").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
            searches_left = account.get("total_searches_left").and_then(serde_json::Value::as_i64),
            "SerpAPI key validated"
        );
        Ok(())
    }

    async fn run<T: Serialize>(&self, engine: &Engine, params: &T) -> Result<CallToolResult, McpError> {
        let descriptor = Descriptor::from_params(params)?;
        let envelope = self.adapter.invoke(engine, descriptor).await?;
        Ok(text_success(envelope.output()))
    }

    // ========================================================================
    // Web
    // ========================================================================

    #[tool(
        description = "Google web search through SerpAPI. Returns organic results, knowledge graph, answer box, related questions and pagination. Output is the provider's raw JSON by default; set readable_json for markdown or clean_json to drop empty fields."
    )]
    async fn google_search(
        &self,
        Parameters(params): Parameters<GoogleSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Google search: {}", params.query);
        self.run(&GOOGLE_SEARCH, &params).await
    }

    #[tool(description = "Look up SerpAPI's canonical location names for the location parameter.")]
    async fn google_locations(
        &self,
        Parameters(params): Parameters<LocationsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_LOCATIONS, &params).await
    }

    #[tool(description = "Show the SerpAPI account's plan and remaining searches.")]
    async fn serpapi_account(
        &self,
        Parameters(params): Parameters<AccountParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&SERPAPI_ACCOUNT, &params).await
    }

    // ========================================================================
    // News, Scholar, Trends, Finance
    // ========================================================================

    #[tool(
        description = "Google News search by query, named topic, or topic/publication/story/section token."
    )]
    async fn google_news_search(
        &self,
        Parameters(params): Parameters<NewsSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_NEWS, &params).await
    }

    #[tool(
        description = "Google Scholar search for articles, citing documents (cites) or all versions of one article (cluster)."
    )]
    async fn google_scholar_search(
        &self,
        Parameters(params): Parameters<ScholarSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_SCHOLAR, &params).await
    }

    #[tool(
        description = "Google Trends interest over time, by region, and related topics/queries for up to 5 terms."
    )]
    async fn google_trends_search(
        &self,
        Parameters(params): Parameters<TrendsSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_TRENDS, &params).await
    }

    #[tool(description = "Google Finance quote, graph window, markets and news for a ticker, index or currency.")]
    async fn google_finance_search(
        &self,
        Parameters(params): Parameters<FinanceSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_FINANCE, &params).await
    }

    // ========================================================================
    // Maps, Images, YouTube
    // ========================================================================

    #[tool(description = "Google Maps local results for a query, or details and reviews for one place.")]
    async fn google_maps_search(
        &self,
        Parameters(params): Parameters<MapsSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_MAPS, &params).await
    }

    #[tool(
        description = "Google Images search with size, color, type, license and time filters."
    )]
    async fn google_images_search(
        &self,
        Parameters(params): Parameters<ImagesSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&GOOGLE_IMAGES, &params).await
    }

    #[tool(description = "YouTube search for videos, channels, playlists and shorts.")]
    async fn youtube_search(
        &self,
        Parameters(params): Parameters<YoutubeSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&YOUTUBE_SEARCH, &params).await
    }

    #[tool(description = "YouTube video details: information, description, related videos and comments.")]
    async fn youtube_video(
        &self,
        Parameters(params): Parameters<YoutubeVideoParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(&YOUTUBE_VIDEO, &params).await
    }
}

// ============================================================================
// Prompt Router Implementation
// ============================================================================

#[prompt_router]
impl SerpApiMcpServer {
    /// Guided Google web search
    #[prompt(name = "google_search_prompt")]
    async fn google_search_prompt(
        &self,
        Parameters(args): Parameters<GoogleSearchPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_search(&args))
    }

    #[prompt(name = "google_locations_prompt")]
    async fn google_locations_prompt(
        &self,
        Parameters(args): Parameters<LocationsPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_locations(&args))
    }

    #[prompt(name = "serpapi_account_prompt")]
    async fn serpapi_account_prompt(
        &self,
        Parameters(args): Parameters<AccountPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::serpapi_account(&args))
    }

    #[prompt(name = "google_news_search_prompt")]
    async fn google_news_search_prompt(
        &self,
        Parameters(args): Parameters<NewsPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_news_search(&args))
    }

    #[prompt(name = "google_scholar_prompt")]
    async fn google_scholar_prompt(
        &self,
        Parameters(args): Parameters<ScholarPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_scholar_search(&args))
    }

    #[prompt(name = "google_trends_prompt")]
    async fn google_trends_prompt(
        &self,
        Parameters(args): Parameters<TrendsPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_trends_search(&args))
    }

    #[prompt(name = "google_finance_search_prompt")]
    async fn google_finance_search_prompt(
        &self,
        Parameters(args): Parameters<FinancePromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_finance_search(&args))
    }

    #[prompt(name = "google_maps_search_prompt")]
    async fn google_maps_search_prompt(
        &self,
        Parameters(args): Parameters<MapsPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_maps_search(&args))
    }

    #[prompt(name = "google_images_prompt")]
    async fn google_images_prompt(
        &self,
        Parameters(args): Parameters<ImagesPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::google_images_search(&args))
    }

    #[prompt(name = "youtube_search_prompt")]
    async fn youtube_search_prompt(
        &self,
        Parameters(args): Parameters<YoutubeSearchPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::youtube_search(&args))
    }

    #[prompt(name = "youtube_video_prompt")]
    async fn youtube_video_prompt(
        &self,
        Parameters(args): Parameters<YoutubeVideoPromptArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(prompts::youtube_video(&args))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
#[prompt_handler]
impl rmcp::ServerHandler for SerpApiMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "SerpAPI MCP Server - Google web, news, scholar, trends, finance, maps and \
                 images search plus YouTube search and video details. Results are SerpAPI's \
                 JSON unless readable_json or clean_json is set. Each tool also has a \
                 guided prompt that phrases the request and suggests the call."
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
impl EmbeddableMcp for SerpApiMcpServer {
    fn server_name(&self) -> &str {
        "serpapi"
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "google_search" => {
                let params = decode_params(name, params)?;
                self.google_search(Parameters(params)).await.map_err(Into::into)
            }
            "google_locations" => {
                let params = decode_params(name, params)?;
                self.google_locations(Parameters(params)).await.map_err(Into::into)
            }
            "serpapi_account" => {
                let params = decode_params(name, params)?;
                self.serpapi_account(Parameters(params)).await.map_err(Into::into)
            }
            "google_news_search" => {
                let params = decode_params(name, params)?;
                self.google_news_search(Parameters(params)).await.map_err(Into::into)
            }
            "google_scholar_search" => {
                let params = decode_params(name, params)?;
                self.google_scholar_search(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "google_trends_search" => {
                let params = decode_params(name, params)?;
                self.google_trends_search(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "google_finance_search" => {
                let params = decode_params(name, params)?;
                self.google_finance_search(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "google_maps_search" => {
                let params = decode_params(name, params)?;
                self.google_maps_search(Parameters(params)).await.map_err(Into::into)
            }
            "google_images_search" => {
                let params = decode_params(name, params)?;
                self.google_images_search(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "youtube_search" => {
                let params = decode_params(name, params)?;
                self.youtube_search(Parameters(params)).await.map_err(Into::into)
            }
            "youtube_video" => {
                let params = decode_params(name, params)?;
                self.youtube_video(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_adapter::{HttpSettings, HttpTransport};

    fn server() -> SerpApiMcpServer {
        let transport = HttpTransport::new(HttpSettings::new("http://127.0.0.1:9")).unwrap();
        SerpApiMcpServer::with_adapter(Adapter::new(
            Arc::new(transport),
            search_adapter::Credential::new("test-key").unwrap(),
        ))
    }

    #[test]
    fn test_embeddable_server_name() {
        assert_eq!(server().server_name(), "serpapi");
    }

    #[test]
    fn test_lists_every_engine() {
        let server = server();
        let tools = server.list_tools();
        assert_eq!(tools.len(), crate::engines::ALL.len());
        for engine in crate::engines::ALL {
            assert!(server.has_tool(engine.tool()), "missing {}", engine.tool());
        }
    }

    #[test]
    fn test_prompts_listed() {
        let router = SerpApiMcpServer::prompt_router();
        let names: Vec<String> = router.list_all().into_iter().map(|p| p.name.to_string()).collect();
        assert_eq!(names.len(), crate::engines::ALL.len());
        for name in [
            "google_search_prompt",
            "google_locations_prompt",
            "serpapi_account_prompt",
            "google_news_search_prompt",
            "google_scholar_prompt",
            "google_trends_prompt",
            "google_finance_search_prompt",
            "google_maps_search_prompt",
            "google_images_prompt",
            "youtube_search_prompt",
            "youtube_video_prompt",
        ] {
            assert!(router.has_route(name), "missing {}", name);
        }
    }

    #[test]
    fn test_capabilities_include_prompts() {
        use rmcp::ServerHandler;
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
    }

    #[test]
    fn test_extra_google_params_flatten() {
        let params: GoogleSearchParams = serde_json::from_value(serde_json::json!({
            "query": "rust",
            "lr": "lang_en",
            "readable_json": true
        }))
        .unwrap();
        assert_eq!(params.readable_json, Some(true));
        assert_eq!(params.extra.get("lr"), Some(&Value::from("lang_en")));
        let descriptor = Descriptor::from_params(&params).unwrap();
        assert_eq!(descriptor.get("lr"), Some(&Value::from("lang_en")));
        assert!(!descriptor.contains("num"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = server()
            .call_tool("bing_search", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddableError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_request() {
        // The transport points at a closed port; a validation failure must
        // come back as such rather than as a connection error.
        let err = server()
            .call_tool("google_search", serde_json::json!({"query": "rust", "num": 101}))
            .await
            .unwrap_err();
        assert_eq!(err.class(), Some(mcp_common::FailureClass::Validation));
        assert!(err.to_string().contains("num"));
    }

    #[tokio::test]
    async fn test_missing_required_param() {
        let err = server()
            .call_tool("youtube_video", serde_json::json!({"hl": "en"}))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddableError::InvalidParams { .. }));
    }
}
