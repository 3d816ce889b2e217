//! HTTP transport behavior against a mock JSON API

use search_adapter::{
    AdapterError, HttpSettings, HttpTransport, QueryParams, Transport,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(HttpSettings::new(server.uri())).unwrap()
}

fn query(pairs: &[(&str, &str)]) -> QueryParams {
    let mut query = QueryParams::new();
    for (k, v) in pairs {
        query.push(*k, *v);
    }
    query
}

#[tokio::test]
async fn test_body_is_returned_verbatim() {
    let server = MockServer::start().await;
    let body = "{\n  \"search_metadata\": {\"status\": \"Success\"},\n  \"organic_results\": []\n}";

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "rust lang"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let doc = transport(&server)
        .get(
            "/search",
            &query(&[("engine", "google"), ("q", "rust lang"), ("api_key", "test-key")]),
        )
        .await
        .unwrap();

    assert_eq!(doc.body(), body);
    assert_eq!(doc.value()["search_metadata"]["status"], "Success");
}

#[tokio::test]
async fn test_error_status_carries_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"Invalid API key."}"#))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get("/search", &query(&[("q", "rust")]))
        .await
        .unwrap_err();

    match err {
        AdapterError::Provider { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key.");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_with_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get("/search", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AdapterError::Provider { status: 503, ref message } if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_error_field_in_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error":"Google hasn't returned any results for this query."}"#),
        )
        .mount(&server)
        .await;

    let err = transport(&server)
        .get("/search", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Provider { status: 200, .. }));
    assert!(err.to_string().contains("hasn't returned any results"));
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get("/search", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Decode { .. }));
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut settings = HttpSettings::new(server.uri());
    settings.timeout_seconds = 1;
    let err = HttpTransport::new(settings)
        .unwrap()
        .get("/search", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Timeout { seconds: 1, .. }));
    assert_eq!(err.class(), mcp_common::FailureClass::Transport);
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    // Nothing listens on port 9 on a test host
    let transport = HttpTransport::new(HttpSettings::new("http://127.0.0.1:9")).unwrap();
    let err = transport
        .get("/search", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Transport { .. }));
}
