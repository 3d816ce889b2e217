//! Transcript retrieval against a mock YouTube

use mcp_common::{result_text, EmbeddableMcp, FailureClass};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use youtube_transcript_mcp::{Config, YoutubeTranscriptMcpServer};

const VIDEO: &str = "dQw4w9WgXcQ";
const API_KEY: &str = "AIzaSyTestKey_123";

const WATCH_PAGE: &str = r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSyTestKey_123", "HL": "en"});</script></html>"#;

const CAPTIONS: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="18.64" dur="3.24">We&amp;#39;re no strangers to love</text>
<text start="22.64" dur="4.32">You know the rules and so do I</text>
<text start="3725.5" dur="2">&lt;i&gt;Never gonna give you up&lt;/i&gt;</text>
</transcript>"#;

fn server(mock: &MockServer) -> YoutubeTranscriptMcpServer {
    let mut config = Config::default();
    config.youtube.base_url = mock.uri();
    YoutubeTranscriptMcpServer::new(&config).unwrap()
}

fn player(tracks: Value) -> Value {
    json!({
        "playabilityStatus": {"status": "OK"},
        "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": tracks}}
    })
}

fn english_tracks() -> Value {
    json!([
        {"baseUrl": format!("/api/timedtext?v={}&lang=en&kind=asr&fmt=srv3", VIDEO),
         "name": {"runs": [{"text": "English (auto-generated)"}]},
         "languageCode": "en", "kind": "asr", "isTranslatable": true}
    ])
}

async fn mount_watch(mock: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", VIDEO))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock)
        .await;
}

async fn mount_player(mock: &MockServer, response: Value) {
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/player"))
        .and(query_param("key", API_KEY))
        .and(body_partial_json(json!({
            "videoId": VIDEO,
            "context": {"client": {"clientName": "ANDROID"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(mock)
        .await;
}

async fn mount_captions(mock: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CAPTIONS))
        .expect(expected)
        .mount(mock)
        .await;
}

#[tokio::test]
async fn test_transcript_with_timestamps() {
    let mock = MockServer::start().await;
    mount_watch(&mock, WATCH_PAGE).await;
    mount_player(&mock, player(english_tracks())).await;
    mount_captions(&mock, 2).await;

    let server = server(&mock);
    let params = json!({
        "video_url": format!("https://www.youtube.com/watch?v={}&t=42s", VIDEO),
        "with_timestamps": true,
        "readable_json": true
    });
    let result = server.call_tool("youtube_transcript", params).await.unwrap();
    assert_eq!(
        result_text(&result),
        Some(
            "[0:18] We're no strangers to love\n\
             [0:22] You know the rules and so do I\n\
             [1:02:05] Never gonna give you up"
        )
    );

    let params = json!({"video_url": VIDEO, "with_timestamps": true});
    let result = server.call_tool("youtube_transcript", params).await.unwrap();
    let segments: Value = serde_json::from_str(result_text(&result).unwrap()).unwrap();
    assert_eq!(segments.as_array().unwrap().len(), 3);
    assert_eq!(
        segments[0],
        json!({"text": "We're no strangers to love", "start": 18.64, "duration": 3.24, "timestamp": "[0:18]"})
    );
}

#[tokio::test]
async fn test_language_unavailable() {
    let mock = MockServer::start().await;
    mount_watch(&mock, WATCH_PAGE).await;
    mount_player(&mock, player(english_tracks())).await;
    mount_captions(&mock, 0).await;

    let err = server(&mock)
        .call_tool("youtube_transcript", json!({"video_url": VIDEO, "language": "de,fr"}))
        .await
        .unwrap_err();
    assert_eq!(err.class(), Some(FailureClass::NotFound));
    let message = err.to_string();
    assert!(message.contains("de, fr"), "{}", message);
    assert!(message.contains("available: en"), "{}", message);
}

#[tokio::test]
async fn test_consent_interstitial() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WATCH_PAGE))
        .with_priority(1)
        .expect(1)
        .mount(&mock)
        .await;
    mount_watch(
        &mock,
        r#"<form action="https://consent.youtube.com/s" method="POST">
           <input type="hidden" name="v" value="cb.20210328-17-p0.en+FX+684"></form>"#,
    )
    .await;
    mount_player(&mock, player(english_tracks())).await;
    mount_captions(&mock, 1).await;

    let result = server(&mock)
        .call_tool("youtube_transcript", json!({"video_url": VIDEO, "text_transcript": true}))
        .await
        .unwrap();
    assert_eq!(
        result_text(&result),
        Some("We're no strangers to love You know the rules and so do I Never gonna give you up")
    );
}

#[tokio::test]
async fn test_transcripts_disabled() {
    let mock = MockServer::start().await;
    mount_watch(&mock, WATCH_PAGE).await;
    mount_player(&mock, json!({"playabilityStatus": {"status": "OK"}})).await;

    let err = server(&mock)
        .call_tool("list_transcripts", json!({"video_url": format!("youtu.be/{}", VIDEO)}))
        .await
        .unwrap_err();
    assert_eq!(err.class(), Some(FailureClass::NotFound));
    assert!(err.to_string().contains("disabled"));
}

#[tokio::test]
async fn test_captcha_page_is_blocked() {
    let mock = MockServer::start().await;
    mount_watch(&mock, r#"<div class="g-recaptcha" data-sitekey="x"></div>"#).await;

    let err = server(&mock)
        .call_tool("youtube_transcript", json!({"video_url": VIDEO}))
        .await
        .unwrap_err();
    assert_eq!(err.class(), Some(FailureClass::Provider));
    assert!(err.to_string().contains("blocking"));
}

#[tokio::test]
async fn test_rate_limited() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock)
        .await;

    let err = server(&mock)
        .call_tool("list_transcripts", json!({"video_url": VIDEO}))
        .await
        .unwrap_err();
    assert_eq!(err.class(), Some(FailureClass::Provider));
}

#[tokio::test]
async fn test_unavailable_video() {
    let mock = MockServer::start().await;
    mount_watch(&mock, WATCH_PAGE).await;
    mount_player(
        &mock,
        json!({"playabilityStatus": {"status": "ERROR", "reason": "This video is unavailable"}}),
    )
    .await;

    let err = server(&mock)
        .call_tool("youtube_transcript", json!({"video_url": VIDEO}))
        .await
        .unwrap_err();
    assert_eq!(err.class(), Some(FailureClass::NotFound));
}
