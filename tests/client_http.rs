//! HTTP-level tests for the Tavily client against a mock server.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tavily_tools::search::{
    ClientConfig, ErrorKind, RetryPolicy, SearchDepth, SearchRequest, SearchService, TavilyClient,
};
use tavily_tools::tools::{ExtractToolParams, SearchToolParams};
use tavily_tools::{ToolCall, ToolExecutor, ToolsCapability};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

fn client(server: &MockServer) -> TavilyClient {
    let config = ClientConfig::builder()
        .api_key("tvly-test")
        .base_url(server.uri())
        .retry(fast_retry())
        .build()
        .unwrap_or_else(|e| panic!("config: {e}"));
    TavilyClient::new(config).unwrap_or_else(|e| panic!("client: {e}"))
}

fn search_body() -> serde_json::Value {
    json!({
        "query": "rust async",
        "answer": null,
        "results": [
            {"title": "Tokio", "url": "https://tokio.rs", "content": "An async runtime.", "score": 0.91},
            {"title": "async-std", "url": "https://async.rs", "content": "Another runtime.", "score": 0.42}
        ],
        "images": [],
        "response_time": 0.73
    })
}

#[tokio::test]
async fn search_parses_results_and_sends_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({"query": "rust async", "search_depth": "advanced", "max_results": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest::new("rust async")
        .depth(SearchDepth::Advanced)
        .max_results(2);
    let result = client(&server)
        .search(&request)
        .await
        .unwrap_or_else(|e| panic!("search: {e}"));

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].url, "https://tokio.rs");
    assert!((result.items[0].score - 0.91).abs() < 1e-9);
    assert!(result.answer.is_none());
    assert!((result.response_time_seconds - 0.73).abs() < 1e-9);
}

#[tokio::test]
async fn out_of_range_max_results_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(0)
        .mount(&server)
        .await;
    let client = client(&server);

    for n in [0, 21] {
        let err = client
            .search(&SearchRequest::new("q").max_results(n))
            .await
            .err()
            .unwrap_or_else(|| panic!("max_results {n} should fail"));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.attempts, 1);
    }
}

#[tokio::test]
async fn transient_failure_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .search(&SearchRequest::new("rust async"))
        .await
        .unwrap_or_else(|e| panic!("search: {e}"));
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": {"error": "Unauthorized: missing or invalid API key."}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .search(&SearchRequest::new("q"))
        .await
        .err()
        .unwrap_or_else(|| panic!("expected auth error"));
    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.attempts, 1);
    assert_eq!(err.message, "Unauthorized: missing or invalid API key.");
}

#[tokio::test]
async fn persistent_server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let err = client(&server)
        .search(&SearchRequest::new("q"))
        .await
        .err()
        .unwrap_or_else(|| panic!("expected server error"));
    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(err.attempts, 4);
}

#[tokio::test]
async fn slow_response_is_a_retried_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_body())
                .set_delay(Duration::from_millis(800)),
        )
        .expect(4)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_key("tvly-test")
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .retry(fast_retry())
        .build()
        .unwrap_or_else(|e| panic!("config: {e}"));
    let err = TavilyClient::new(config)
        .unwrap_or_else(|e| panic!("client: {e}"))
        .search(&SearchRequest::new("q"))
        .await
        .err()
        .unwrap_or_else(|| panic!("expected timeout"));
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert!(err.is_retryable());
    assert_eq!(err.attempts, 4);
}

#[tokio::test]
async fn refused_connection_is_a_retried_network_error() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap_or_else(|e| panic!("bind: {e}"));

    let config = ClientConfig::builder()
        .api_key("tvly-test")
        .base_url(format!("http://127.0.0.1:{port}"))
        .retry(fast_retry())
        .build()
        .unwrap_or_else(|e| panic!("config: {e}"));
    let err = TavilyClient::new(config)
        .unwrap_or_else(|e| panic!("client: {e}"))
        .search(&SearchRequest::new("q"))
        .await
        .err()
        .unwrap_or_else(|| panic!("expected network error"));
    assert_eq!(err.kind, ErrorKind::Network);
    assert!(err.is_retryable());
    assert_eq!(err.attempts, 4);
}

#[tokio::test]
async fn extract_sends_deduplicated_batch_and_orders_by_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_json(json!({"urls": ["https://a.example", "https://b.example"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"url": "https://b.example", "raw_content": "B body"}],
            "failed_results": [{"url": "https://a.example", "error": "timeout"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let urls = vec![
        "https://a.example".to_string(),
        "https://a.example".to_string(),
        "https://b.example".to_string(),
    ];
    let result = client(&server)
        .extract(&urls)
        .await
        .unwrap_or_else(|e| panic!("extract: {e}"));

    assert_eq!(result.succeeded.len(), 1);
    assert_eq!(result.succeeded[0].raw_content, "B body");
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].error, "timeout");
    assert!(result.dropped.is_empty());
}

#[tokio::test]
async fn extract_over_limit_sends_first_twenty() {
    let server = MockServer::start().await;
    let urls: Vec<String> = (0..25).map(|i| format!("https://site{i}.example")).collect();
    let results: Vec<serde_json::Value> = urls[..20]
        .iter()
        .map(|u| json!({"url": u, "raw_content": "ok"}))
        .collect();
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_json(json!({"urls": &urls[..20]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": results, "failed_results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .extract(&urls)
        .await
        .unwrap_or_else(|e| panic!("extract: {e}"));

    assert_eq!(result.succeeded.len(), 20);
    assert!(result.failed.is_empty());
    assert_eq!(result.dropped, urls[20..].to_vec());
}

#[tokio::test]
async fn context_respects_token_budget() {
    let server = MockServer::start().await;
    let long = "x".repeat(400);
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "q",
            "results": [
                {"title": "1", "url": "https://one.example", "content": long, "score": 0.9},
                {"title": "2", "url": "https://two.example", "content": long, "score": 0.8}
            ]
        })))
        .mount(&server)
        .await;
    let client = client(&server);

    let one: serde_json::Value = serde_json::from_str(
        &client
            .get_context("q", Some(150))
            .await
            .unwrap_or_else(|e| panic!("context: {e}")),
    )
    .unwrap_or_else(|e| panic!("json: {e}"));
    assert_eq!(one.as_array().map(Vec::len), Some(1));
    assert_eq!(one[0]["url"], "https://one.example");

    let both: serde_json::Value = serde_json::from_str(
        &client
            .get_context("q", None)
            .await
            .unwrap_or_else(|e| panic!("context: {e}")),
    )
    .unwrap_or_else(|e| panic!("json: {e}"));
    assert_eq!(both.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn tool_text_for_mixed_extract_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_json(json!({"urls": ["https://a.example", "https://b.example"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"url": "https://a.example", "raw_content": "A body"},
                {"url": "https://b.example", "raw_content": "B body"}
            ],
            "failed_results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service: Arc<dyn SearchService> = Arc::new(client(&server));
    let tools = ToolsCapability::new(service);
    let text = tools
        .extract(ExtractToolParams {
            urls: vec![
                "https://a.example".to_string(),
                "https://a.example".to_string(),
                "not-a-url".to_string(),
                "https://b.example".to_string(),
            ],
        })
        .await
        .unwrap_or_else(|e| panic!("extract tool: {e}"));

    assert_eq!(
        text,
        "Extracted content from 2 URL(s):\n\n\
         ## https://a.example\n\nA body\n\n---\n\n## https://b.example\n\nB body\n\n\
         Failed URLs:\n- not-a-url: Invalid URL: expected an absolute http(s) URL with a host"
    );
}

#[tokio::test]
async fn remote_failure_is_rendered_into_tool_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"detail": "Rate limit exceeded"})))
        .mount(&server)
        .await;

    let service: Arc<dyn SearchService> = Arc::new(client(&server));
    let executor = ToolExecutor::for_capability(Arc::new(ToolsCapability::new(service)));
    let call = ToolCall {
        id: "call_1".to_string(),
        name: "search".to_string(),
        arguments: serde_json::to_string(&SearchToolParams::new("q"))
            .unwrap_or_else(|e| panic!("encode: {e}")),
    };
    let result = executor.execute(&call).await;

    assert!(!result.is_error);
    assert_eq!(
        result.content,
        "Tavily error: Rate limit exceeded (after 4 attempts) (type: RATE_LIMIT_ERROR)"
    );
}
