//! Where transcripts come from
//!
//! [`YouTubeClient`] talks to YouTube directly: the watch page yields the
//! innertube API key, the player endpoint lists caption tracks, and each
//! track's timed-text URL returns the caption XML.

use async_trait::async_trait;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy, RequestBuilder, StatusCode};
use search_adapter::AdapterError;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

use crate::config::YoutubeConfig;
use crate::cookies::{add_to_jar, load_cookie_file};
use crate::error::{TranscriptError, TranscriptResult};
use crate::timedtext::{parse_timed_text, Segment};
use crate::track::{parse_player, Track, TrackList};

static API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid regex"));
static CONSENT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("valid regex"));

const CONSENT_FORM: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA: &str = "class=\"g-recaptcha\"";

/// Innertube client the player request pretends to be
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

/// Options that change how a single call reaches YouTube
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub proxy: Option<String>,
    pub cookies_path: Option<PathBuf>,
    pub preserve_formatting: bool,
}

impl FetchOptions {
    /// Validate the per-call options; blank strings count as absent.
    pub fn new(
        proxy: Option<String>,
        cookies_path: Option<String>,
        preserve_formatting: bool,
    ) -> TranscriptResult<Self> {
        let proxy = proxy.filter(|p| !p.trim().is_empty());
        if let Some(proxy) = &proxy {
            let url = Url::parse(proxy)
                .map_err(|e| TranscriptError::invalid_option("proxy", e.to_string()))?;
            if url.scheme() != "https" {
                return Err(TranscriptError::invalid_option(
                    "proxy",
                    "must be an https:// URL",
                ));
            }
        }

        Ok(Self {
            proxy,
            cookies_path: cookies_path
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            preserve_formatting,
        })
    }
}

/// Something that can list and download caption tracks
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Every caption track of `video_id`
    async fn list(&self, video_id: &str, options: &FetchOptions) -> TranscriptResult<TrackList>;

    /// Download and parse one track of `video_id`
    async fn fetch(
        &self,
        video_id: &str,
        track: &Track,
        options: &FetchOptions,
    ) -> TranscriptResult<Vec<Segment>>;
}

/// Direct YouTube access
pub struct YouTubeClient {
    base_url: Url,
    timeout_seconds: u64,
    user_agent: String,
    accept_language: String,
}

impl YouTubeClient {
    pub fn new(config: &YoutubeConfig) -> TranscriptResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| AdapterError::validation("base_url", format!("{}: {}", config.base_url, e)))?;
        Ok(Self {
            base_url,
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// A client carrying this call's proxy and cookies
    fn client(&self, options: &FetchOptions) -> TranscriptResult<(Client, Arc<Jar>)> {
        let jar = Arc::new(Jar::default());
        if let Some(path) = &options.cookies_path {
            add_to_jar(&jar, &load_cookie_file(path)?);
        }

        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&self.accept_language)
            .map_err(|e| AdapterError::validation("accept_language", e.to_string()))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let mut builder = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(self.timeout_seconds));
        if let Some(proxy) = &options.proxy {
            let proxy =
                Proxy::all(proxy).map_err(|e| TranscriptError::invalid_option("proxy", e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| AdapterError::Transport {
            endpoint: self.base_url.to_string(),
            message: e.to_string(),
        })?;
        Ok((client, jar))
    }

    fn url(&self, path: &str) -> TranscriptResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TranscriptError::Unparsable(format!("bad URL {}: {}", path, e)))
    }

    /// Send and read the body; 429 means YouTube is rate limiting us.
    async fn body(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        video_id: &str,
    ) -> TranscriptResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::from_reqwest(endpoint, self.timeout_seconds, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(endpoint, video_id, "Rate limited by YouTube");
            return Err(TranscriptError::RequestBlocked(video_id.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest(endpoint, self.timeout_seconds, e))?;
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "YouTube request failed");
            return Err(AdapterError::Provider {
                status: status.as_u16(),
                message: format!("{} for video {}", endpoint, video_id),
            }
            .into());
        }
        Ok(body)
    }

    async fn watch_page(&self, client: &Client, video_id: &str) -> TranscriptResult<String> {
        let mut url = self.url("/watch")?;
        url.query_pairs_mut().append_pair("v", video_id);
        self.body(client.get(url), "/watch", video_id).await
    }

    /// The watch page HTML, past the cookie consent interstitial if shown
    async fn watch_page_with_consent(
        &self,
        client: &Client,
        jar: &Jar,
        video_id: &str,
    ) -> TranscriptResult<String> {
        let html = self.watch_page(client, video_id).await?;
        if !html.contains(CONSENT_FORM) {
            return Ok(html);
        }

        tracing::debug!(video_id, "Accepting cookie consent");
        let value = CONSENT_VALUE
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TranscriptError::Consent(video_id.to_string()))?;
        jar.add_cookie_str(&format!("CONSENT=YES+{}; Path=/", value), &self.base_url);

        let html = self.watch_page(client, video_id).await?;
        if html.contains(CONSENT_FORM) {
            return Err(TranscriptError::Consent(video_id.to_string()));
        }
        Ok(html)
    }

    async fn player(&self, client: &Client, video_id: &str, api_key: &str) -> TranscriptResult<Value> {
        let mut url = self.url("/youtubei/v1/player")?;
        url.query_pairs_mut().append_pair("key", api_key);
        let body = json!({
            "context": {"client": {"clientName": CLIENT_NAME, "clientVersion": CLIENT_VERSION}},
            "videoId": video_id,
        });

        let text = self
            .body(client.post(url).json(&body), "/youtubei/v1/player", video_id)
            .await?;
        serde_json::from_str(&text)
            .map_err(|e| TranscriptError::Unparsable(format!("player response: {}", e)))
    }
}

/// The innertube key embedded in a watch page
fn extract_api_key(video_id: &str, html: &str) -> TranscriptResult<String> {
    if let Some(key) = API_KEY.captures(html).and_then(|caps| caps.get(1)) {
        return Ok(key.as_str().to_string());
    }
    if html.contains(RECAPTCHA) {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }
    Err(TranscriptError::Unparsable(
        "watch page has no INNERTUBE_API_KEY".to_string(),
    ))
}

#[async_trait]
impl TranscriptSource for YouTubeClient {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn list(&self, video_id: &str, options: &FetchOptions) -> TranscriptResult<TrackList> {
        let (client, jar) = self.client(options)?;
        let html = self.watch_page_with_consent(&client, &jar, video_id).await?;
        let api_key = extract_api_key(video_id, &html)?;
        let player = self.player(&client, video_id, &api_key).await?;
        let tracks = parse_player(video_id, &player)?;
        tracing::debug!(video_id, tracks = tracks.tracks.len(), "Listed caption tracks");
        Ok(tracks)
    }

    async fn fetch(
        &self,
        video_id: &str,
        track: &Track,
        options: &FetchOptions,
    ) -> TranscriptResult<Vec<Segment>> {
        let (client, _) = self.client(options)?;
        let url = self.url(&track.base_url)?;
        let xml = self.body(client.get(url), "/api/timedtext", video_id).await?;
        parse_timed_text(&xml, options.preserve_formatting)
    }
}
