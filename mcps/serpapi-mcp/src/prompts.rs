//! Guided prompts, one per search tool
//!
//! Prompt arguments arrive as strings and carry the same names as the
//! matching tool's parameters. Each builder phrases the request the way a
//! user would and suggests the tool call that answers it.

use mcp_common::{parse_flag, ToolCallPrompt};
use rmcp::model::GetPromptResult;
use schemars::JsonSchema;
use search_adapter::split_list;
use serde::{Deserialize, Serialize};

// ============================================================================
// Argument Types
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GoogleSearchPromptArgs {
    /// What to search for
    pub query: String,
    pub num: Option<String>,
    pub start: Option<String>,
    pub location: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub device: Option<String>,
    pub safe: Option<String>,
    pub filter: Option<String>,
    pub time_period: Option<String>,
    pub exact_terms: Option<String>,
    /// Comma-separated domains
    pub include_domains: Option<String>,
    /// Comma-separated domains
    pub exclude_domains: Option<String>,
    pub readable_json: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LocationsPromptArgs {
    pub query: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct AccountPromptArgs {
    pub readable_json: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewsPromptArgs {
    pub query: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub topic_token: Option<String>,
    pub publication_token: Option<String>,
    pub story_token: Option<String>,
    pub section_token: Option<String>,
    pub sort_by_date: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScholarPromptArgs {
    pub query: Option<String>,
    /// Article id whose citing papers to list
    pub cites: Option<String>,
    /// Article id whose versions to list
    pub cluster: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub hl: Option<String>,
    pub num: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TrendsPromptArgs {
    /// Up to five comma-separated terms
    pub query: String,
    pub geo: Option<String>,
    pub date: Option<String>,
    /// TIMESERIES, GEO_MAP, GEO_MAP_0, RELATED_TOPICS or RELATED_QUERIES
    pub data_type: Option<String>,
    pub cat: Option<String>,
    pub gprop: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct FinancePromptArgs {
    /// Ticker such as "GOOGL:NASDAQ", or a company name
    pub query: String,
    pub hl: Option<String>,
    pub window: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct MapsPromptArgs {
    pub query: Option<String>,
    pub place_id: Option<String>,
    /// "@latitude,longitude,zoom"
    pub ll: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ImagesPromptArgs {
    pub query: String,
    pub location: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Zero-based page number
    pub page: Option<String>,
    pub imgsz: Option<String>,
    pub image_color: Option<String>,
    pub image_type: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeSearchPromptArgs {
    pub query: String,
    pub gl: Option<String>,
    pub hl: Option<String>,
    /// Filter token copied from a YouTube results URL
    pub sp: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeVideoPromptArgs {
    pub video_id: String,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub next_page_token: Option<String>,
}

// ============================================================================
// Builders
// ============================================================================

pub fn google_search(args: &GoogleSearchPromptArgs) -> GetPromptResult {
    let include = args.include_domains.as_deref().map(split_list).unwrap_or_default();
    let exclude = args.exclude_domains.as_deref().map(split_list).unwrap_or_default();

    ToolCallPrompt::new("google_search", "I want to search Google")
        .described("query", Some(args.query.as_str()), |v| format!("for '{}'", v))
        .described("location", args.location.as_deref(), |v| format!("from {}", v))
        .described("gl", args.gl.as_deref(), |v| format!("in {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in language {}", v))
        .described("device", args.device.as_deref(), |v| format!("on {}", v))
        .described("safe", args.safe.as_deref(), |v| format!("with safe search {}", v))
        .described("time_period", args.time_period.as_deref(), |v| format!("for the past {}", v))
        .described("exact_terms", args.exact_terms.as_deref(), |v| format!("with exact phrase '{}'", v))
        .described("include_domains", args.include_domains.as_deref(), |_| {
            format!("only on domains {}", include.join(", "))
        })
        .described("exclude_domains", args.exclude_domains.as_deref(), |_| {
            format!("excluding domains {}", exclude.join(", "))
        })
        .described("start", args.start.as_deref(), |v| format!("starting from result {}", v))
        .integer("start", args.start.as_deref())
        .integer("num", args.num.as_deref())
        .flag("filter", args.filter.as_deref())
        .flag("readable_json", args.readable_json.as_deref())
        .build("Search Google and summarize the organic results, knowledge graph and answer box")
}

pub fn google_locations(args: &LocationsPromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("google_locations", "I want to see available Google search locations")
        .described("query", args.query.as_deref(), |v| format!("matching '{}'", v))
        .described("limit", args.limit.as_deref(), |v| format!("limited to {} results", v))
        .integer("limit", args.limit.as_deref())
        .build("Find the location strings Google search accepts")
}

pub fn serpapi_account(args: &AccountPromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("serpapi_account", "I want to see my SerpAPI account information")
        .flag("readable_json", args.readable_json.as_deref())
        .build("Report the SerpAPI plan, usage and remaining searches")
}

pub fn google_news_search(args: &NewsPromptArgs) -> GetPromptResult {
    let sort_by_date = parse_flag(args.sort_by_date.as_deref()).unwrap_or(false);
    let mut prompt = ToolCallPrompt::new("google_news_search", "I want to search for news")
        .described("query", args.query.as_deref(), |v| format!("about {}", v))
        .described("gl", args.gl.as_deref(), |v| format!("in {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in {}", v))
        .described("publication_token", args.publication_token.as_deref(), |_| {
            "from a specific publication".to_string()
        })
        .described("topic_token", args.topic_token.as_deref(), |_| {
            "on a specific topic".to_string()
        })
        .described("story_token", args.story_token.as_deref(), |_| {
            "with full coverage of a specific story".to_string()
        })
        .described("section_token", args.section_token.as_deref(), |_| {
            "from a specific section".to_string()
        })
        .flag("sort_by_date", args.sort_by_date.as_deref());
    if sort_by_date {
        prompt = prompt.note("sorted by date");
    }
    prompt.build("Search Google News for articles, publications, topics and full-coverage stories")
}

pub fn google_scholar_search(args: &ScholarPromptArgs) -> GetPromptResult {
    let mut prompt = ToolCallPrompt::new("google_scholar_search", "I want to search Google Scholar")
        .described("query", args.query.as_deref(), |v| format!("for '{}'", v))
        .described("cites", args.cites.as_deref(), |v| {
            format!("for papers citing the article with ID '{}'", v)
        })
        .described("cluster", args.cluster.as_deref(), |v| {
            format!("for all versions of the article with ID '{}'", v)
        });

    let from = args.year_from.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let to = args.year_to.as_deref().map(str::trim).filter(|v| !v.is_empty());
    match (from, to) {
        (Some(from), Some(to)) => prompt = prompt.note(format!("published between {} and {}", from, to)),
        (Some(from), None) => prompt = prompt.note(format!("published since {}", from)),
        (None, Some(to)) => prompt = prompt.note(format!("published before {}", to)),
        (None, None) => {}
    }

    prompt
        .integer("year_from", from)
        .integer("year_to", to)
        .described("hl", args.hl.as_deref(), |v| format!("with interface language set to '{}'", v))
        .integer("num", args.num.as_deref())
        .build("Search Google Scholar for papers, citations and article versions")
}

pub fn google_trends_search(args: &TrendsPromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("google_trends_search", "I want to analyze Google Trends data")
        .described("query", Some(args.query.as_str()), |v| format!("for '{}'", v))
        .described("geo", args.geo.as_deref(), |v| format!("in {}", v))
        .described("date", args.date.as_deref(), |v| format!("over the time period {}", v))
        .described("data_type", args.data_type.as_deref(), |v| {
            format!("focusing on {}", trends_data_type(v))
        })
        .described("gprop", args.gprop.as_deref(), |v| format!("for {}", v))
        .integer("cat", args.cat.as_deref())
        .build("Analyze search interest over time, by region, and related topics and queries")
}

fn trends_data_type(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "TIMESERIES" => "interest over time",
        "GEO_MAP" => "comparison by region",
        "GEO_MAP_0" => "interest by region",
        "RELATED_TOPICS" => "related topics",
        "RELATED_QUERIES" => "related queries",
        _ => code,
    }
}

pub fn google_finance_search(args: &FinancePromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("google_finance_search", "I want to search for financial information")
        .described("query", Some(args.query.as_str()), |v| format!("about '{}'", v))
        .described("hl", args.hl.as_deref(), |v| format!("in {} language", v))
        .described("window", args.window.as_deref(), |v| format!("with a time window of {}", v))
        .build("Look up quotes, market movers and financial news on Google Finance")
}

pub fn google_maps_search(args: &MapsPromptArgs) -> GetPromptResult {
    let mut prompt = ToolCallPrompt::new("google_maps_search", "I want to search for places")
        .described("query", args.query.as_deref(), |v| format!("matching '{}'", v));
    if args.place_id.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        prompt = prompt.note("and get detailed information about a specific place");
    }
    prompt
        .described("place_id", args.place_id.as_deref(), |v| format!("with place ID '{}'", v))
        .described("ll", args.ll.as_deref(), |v| format!("near the coordinates {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in {} language", v))
        .described("gl", args.gl.as_deref(), |v| format!("in {} country", v))
        .build("Find places on Google Maps and report ratings, addresses and hours")
}

pub fn google_images_search(args: &ImagesPromptArgs) -> GetPromptResult {
    let filters: Vec<String> = [
        ("size", &args.imgsz),
        ("color", &args.image_color),
        ("type", &args.image_type),
    ]
    .into_iter()
    .filter_map(|(name, value)| {
        let value = value.as_deref()?.trim();
        (!value.is_empty()).then(|| format!("{}: {}", name, value))
    })
    .collect();

    let mut prompt = ToolCallPrompt::new("google_images_search", "I want to search for images")
        .described("query", Some(args.query.as_str()), |v| format!("of '{}'", v))
        .described("location", args.location.as_deref(), |v| format!("in {}", v))
        .described("gl", args.gl.as_deref(), |v| format!("from {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in {} language", v));
    if let Some(page) = args.page.as_deref().and_then(|p| p.trim().parse::<i64>().ok()) {
        prompt = prompt.note(format!("on page {}", page + 1));
    }
    if !filters.is_empty() {
        prompt = prompt.note(format!("with filters ({})", filters.join(", ")));
    }
    prompt
        .integer("page", args.page.as_deref())
        .arg("imgsz", args.imgsz.as_deref())
        .arg("image_color", args.image_color.as_deref())
        .arg("image_type", args.image_type.as_deref())
        .build("Search Google Images and describe the matching images")
}

pub fn youtube_search(args: &YoutubeSearchPromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("youtube_search", "I want to search for videos on YouTube")
        .described("query", Some(args.query.as_str()), |v| format!("about {}", v))
        .described("gl", args.gl.as_deref(), |v| format!("in {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in language {}", v))
        .described("sp", args.sp.as_deref(), |_| "with special filtering".to_string())
        .build("Search YouTube for videos, channels and playlists")
}

pub fn youtube_video(args: &YoutubeVideoPromptArgs) -> GetPromptResult {
    ToolCallPrompt::new("youtube_video", "I want to get information about a YouTube video")
        .described("video_id", Some(args.video_id.as_str()), |v| format!("with ID {}", v))
        .described("gl", args.gl.as_deref(), |v| format!("in {}", v))
        .described("hl", args.hl.as_deref(), |v| format!("in language {}", v))
        .described("next_page_token", args.next_page_token.as_deref(), |_| {
            "with pagination".to_string()
        })
        .build("Get a YouTube video's details, related videos and comments")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;

    fn texts(result: &GetPromptResult) -> Vec<String> {
        result
            .messages
            .iter()
            .map(|message| match &message.content {
                PromptMessageContent::Text { text } => text.clone(),
                other => panic!("unexpected content {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_google_search_prompt() {
        let result = google_search(&GoogleSearchPromptArgs {
            query: "climate change solutions".into(),
            location: Some("Austin, Texas".into()),
            num: Some("5".into()),
            include_domains: Some("nature.com, science.org".into()),
            readable_json: Some("true".into()),
            ..Default::default()
        });
        let texts = texts(&result);
        assert_eq!(
            texts[0],
            "I want to search Google for 'climate change solutions' from Austin, Texas \
             only on domains nature.com, science.org."
        );
        assert!(texts[1].contains("`google_search`"));
        assert!(texts[1].contains("\"num\": 5"));
        assert!(texts[1].contains("\"include_domains\": \"nature.com, science.org\""));
        assert!(texts[1].contains("\"readable_json\": true"));
    }

    #[test]
    fn test_scholar_year_range() {
        let since = google_scholar_search(&ScholarPromptArgs {
            query: Some("transformers".into()),
            year_from: Some("2020".into()),
            ..Default::default()
        });
        assert_eq!(texts(&since)[0], "I want to search Google Scholar for 'transformers' published since 2020.");
        assert!(texts(&since)[1].contains("\"year_from\": 2020"));

        let between = google_scholar_search(&ScholarPromptArgs {
            cites: Some("123".into()),
            year_from: Some("2018".into()),
            year_to: Some("2021".into()),
            ..Default::default()
        });
        assert_eq!(
            texts(&between)[0],
            "I want to search Google Scholar for papers citing the article with ID '123' \
             published between 2018 and 2021."
        );
    }

    #[test]
    fn test_news_sorted_by_date() {
        let result = google_news_search(&NewsPromptArgs {
            query: Some("chips".into()),
            story_token: Some("CAAq".into()),
            sort_by_date: Some("true".into()),
            ..Default::default()
        });
        assert_eq!(
            texts(&result)[0],
            "I want to search for news about chips with full coverage of a specific story sorted by date."
        );
    }

    #[test]
    fn test_trends_names_data_type() {
        let result = google_trends_search(&TrendsPromptArgs {
            query: "rust,go".into(),
            data_type: Some("GEO_MAP_0".into()),
            ..Default::default()
        });
        assert_eq!(
            texts(&result)[0],
            "I want to analyze Google Trends data for 'rust,go' focusing on interest by region."
        );
    }

    #[test]
    fn test_images_page_and_filters() {
        let result = google_images_search(&ImagesPromptArgs {
            query: "ferris".into(),
            page: Some("1".into()),
            image_color: Some("red".into()),
            image_type: Some("clipart".into()),
            ..Default::default()
        });
        let texts = texts(&result);
        assert_eq!(
            texts[0],
            "I want to search for images of 'ferris' on page 2 with filters (color: red, type: clipart)."
        );
        assert!(texts[1].contains("\"page\": 1"));
    }

    #[test]
    fn test_account_prompt_has_no_request_arguments() {
        let result = serpapi_account(&AccountPromptArgs::default());
        let texts = texts(&result);
        assert_eq!(texts[0], "I want to see my SerpAPI account information.");
        assert!(texts[1].ends_with("```json\n{}\n```"));
    }
}
