//! Tests for the retrying client over a mocked transport

use crate::client::ApiClient;
use crate::config::{ClientConfig, ResilienceConfig};
use crate::error::CourierError;
use crate::transport::{ApiRequest, ApiResponse, MockTransport};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("courier_core=debug")
        .with_test_writer()
        .try_init();
}

fn fast_resilience() -> ResilienceConfig {
    ResilienceConfig::default()
        .with_max_calls_per_minute(1000)
        .with_base_delay(Duration::from_millis(10))
        .with_max_retries(3)
}

fn test_config(resilience: ResilienceConfig) -> ClientConfig {
    ClientConfig::new("https://api.example.com").with_resilience(resilience)
}

fn client_over(mock: MockTransport, resilience: ResilienceConfig) -> ApiClient {
    ApiClient::with_transport(test_config(resilience), Arc::new(mock)).unwrap()
}

fn ok_response(body: &str) -> ApiResponse {
    ApiResponse::new(200, HashMap::new(), body.as_bytes().to_vec())
}

fn status_response(status: u16) -> ApiResponse {
    ApiResponse::new(status, HashMap::new(), Vec::new())
}

#[tokio::test]
async fn test_successful_call_returns_response() {
    init_tracing();
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(1)
        .returning(|_| Ok(ok_response("{\"id\": 1}")));

    let client = client_over(mock, fast_resilience());
    let response = client.get("/posts/1", &[]).await.unwrap();
    assert_eq!(response.status, 200);

    let value: serde_json::Value = response.json().unwrap();
    assert_eq!(value["id"], 1);
}

#[tokio::test]
async fn test_retry_budget_then_request_failed() {
    let mut mock = MockTransport::new();
    // max_retries = 3 allows exactly 4 transport invocations
    mock.expect_perform()
        .times(4)
        .returning(|_| Err(CourierError::transport("connection refused")));

    let client = client_over(mock, fast_resilience());
    let error = client.get("/posts/1", &[]).await.unwrap_err();

    match error {
        CourierError::RequestFailed { attempts, source } => {
            assert_eq!(attempts, 4);
            assert!(matches!(*source, CourierError::Transport { .. }));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_does_not_retry() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(1)
        .returning(|_| Ok(status_response(404)));

    let client = client_over(mock, fast_resilience());
    let error = client.get("/posts/999", &[]).await.unwrap_err();
    assert!(matches!(error, CourierError::Client { status: 404, .. }));
}

#[tokio::test]
async fn test_remote_rate_limit_retries() {
    let mut mock = MockTransport::new();
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    mock.expect_perform().times(2).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(status_response(429))
        } else {
            Ok(ok_response("ok"))
        }
    });

    let client = client_over(mock, fast_resilience());
    let response = client.get("/posts", &[]).await.unwrap();
    assert_eq!(response.text(), "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_after_hint_overrides_backoff() {
    let mut mock = MockTransport::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    mock.expect_perform().times(2).returning(move |_| {
        if counter_clone.fetch_add(1, Ordering::SeqCst) == 0 {
            let mut headers = HashMap::new();
            headers.insert("Retry-After".to_string(), "0".to_string());
            Ok(ApiResponse::new(429, headers, Vec::new()))
        } else {
            Ok(ok_response("ok"))
        }
    });

    // A long base delay would dominate if the hint were ignored.
    let resilience = fast_resilience().with_base_delay(Duration::from_secs(2));
    let client = client_over(mock, resilience);

    let start = Instant::now();
    client.get("/posts", &[]).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_server_error_retries_until_success() {
    let mut mock = MockTransport::new();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    mock.expect_perform().times(3).returning(move |_| {
        match counter_clone.fetch_add(1, Ordering::SeqCst) {
            0 | 1 => Ok(status_response(503)),
            _ => Ok(ok_response("recovered")),
        }
    });

    let client = client_over(mock, fast_resilience());
    let response = client.get("/flaky", &[]).await.unwrap();
    assert_eq!(response.text(), "recovered");
}

#[tokio::test]
async fn test_backoff_delays_grow_exponentially() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(3)
        .returning(|_| Err(CourierError::transport("down")));

    let resilience = fast_resilience()
        .with_max_retries(2)
        .with_base_delay(Duration::from_millis(50));
    let client = client_over(mock, resilience);

    // Two backoffs: 50ms then 100ms.
    let start = Instant::now();
    let _ = client.get("/down", &[]).await;
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_get_responses_are_cached() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(1)
        .returning(|_| Ok(ok_response("cached")));

    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::from_secs(60)));

    let first = client.get("/posts/1", &[]).await.unwrap();
    let second = client.get("/posts/1", &[]).await.unwrap();
    assert_eq!(first.text(), second.text());

    let stats = client.cache().statistics().await;
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_zero_ttl_disables_response_caching() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(2)
        .returning(|_| Ok(ok_response("always fresh")));

    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::ZERO));

    client.get("/posts/1", &[]).await.unwrap();
    client.get("/posts/1", &[]).await.unwrap();
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_post_is_never_cached() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(2)
        .returning(|_| Ok(ok_response("created")));

    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::from_secs(60)));

    client.post("/posts", json!({"title": "a"})).await.unwrap();
    client.post("/posts", json!({"title": "a"})).await.unwrap();
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_cache_hit_consumes_no_admission() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(1)
        .returning(|_| Ok(ok_response("hot")));

    // Quota of one: a second transport call within the window would block.
    let resilience = fast_resilience()
        .with_max_calls_per_minute(1)
        .with_cache_ttl(Duration::from_secs(60));
    let client = client_over(mock, resilience);

    let start = Instant::now();
    client.get("/posts/1", &[]).await.unwrap();
    client.get("/posts/1", &[]).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(200));
    assert_eq!(client.limiter().current_count().await, 1);
}

#[tokio::test]
async fn test_cancellation_during_backoff() {
    init_tracing();
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .returning(|_| Err(CourierError::transport("down")));

    let resilience = fast_resilience().with_base_delay(Duration::from_secs(30));
    let client = Arc::new(client_over(mock, resilience));

    let token = CancellationToken::new();
    let handle = {
        let client = client.clone();
        let token = token.clone();
        tokio::spawn(async move {
            let request = ApiRequest::get("/down");
            client.call_with_cancel(&request, Some(&token)).await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(CourierError::Cancelled)));
}

#[tokio::test]
async fn test_pre_cancelled_token_fails_without_transport_call() {
    let mock = MockTransport::new();
    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::ZERO));

    let token = CancellationToken::new();
    token.cancel();

    let request = ApiRequest::get("/posts/1");
    let result = client.call_with_cancel(&request, Some(&token)).await;
    assert!(matches!(result, Err(CourierError::Cancelled)));
}

#[tokio::test]
async fn test_fetch_all_pages_stops_on_empty_page() {
    let mut mock = MockTransport::new();
    mock.expect_perform().times(3).returning(|request| {
        let page = request
            .query
            .iter()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.as_str())
            .unwrap_or("1");
        let body = match page {
            "1" => "[{\"id\": 1}, {\"id\": 2}]",
            "2" => "[{\"id\": 3}]",
            _ => "[]",
        };
        Ok(ok_response(body))
    });

    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::ZERO));
    let items = client
        .fetch_all_pages("/posts", &[], &crate::client::PageConfig::default())
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["id"], 3);
}

#[tokio::test]
async fn test_fetch_all_pages_respects_max_pages() {
    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(2)
        .returning(|_| Ok(ok_response("[{\"id\": 1}]")));

    let client = client_over(mock, fast_resilience().with_cache_ttl(Duration::ZERO));
    let pages = crate::client::PageConfig::default().with_max_pages(2);
    let items = client.fetch_all_pages("/posts", &[], &pages).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_get_json_decodes_into_struct() {
    #[derive(serde::Deserialize)]
    struct Post {
        id: u32,
        title: String,
    }

    let mut mock = MockTransport::new();
    mock.expect_perform()
        .times(1)
        .returning(|_| Ok(ok_response("{\"id\": 7, \"title\": \"hello\"}")));

    let client = client_over(mock, fast_resilience());
    let post: Post = client.get_json("/posts/7", &[]).await.unwrap();
    assert_eq!(post.id, 7);
    assert_eq!(post.title, "hello");
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let mock = MockTransport::new();
    let config = test_config(fast_resilience().with_max_calls_per_minute(0));
    let result = ApiClient::with_transport(config, Arc::new(mock));
    assert!(matches!(result, Err(CourierError::InvalidInput { .. })));
}

#[test]
fn test_client_construction_with_defaults() {
    let mock = MockTransport::new();
    let config = ClientConfig::new("https://api.example.com");
    let client = assert_ok!(ApiClient::with_transport(config, Arc::new(mock)));
    assert_eq!(client.config().resilience.max_retries, 3);
    assert_eq!(client.limiter().max_calls(), 60);
}
