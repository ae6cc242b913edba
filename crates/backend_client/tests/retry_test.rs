//! Retry behaviour: idempotent GETs are retried, writes and chat calls are not


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chat_core::ModelId;
use chat_state::ModelDispatcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::client_for;

/// GET retries on transient errors (5xx)
#[tokio::test]
async fn test_get_retries_on_server_error() {
    let mock_server = MockServer::start().await;
    let request_count = Arc::new(AtomicUsize::new(0));
    let counter = request_count.clone();

    // Fails twice then succeeds
    Mock::given(method("GET"))
        .and(path("/api/backend-da/sessions"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503).set_body_string("Service Unavailable")
            } else {
                ResponseTemplate::new(200).set_body_string("[]")
            }
        })
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 3);
    let sessions = client.list_sessions().await.expect("Request should succeed after retries");

    assert!(sessions.is_empty());
    assert_eq!(request_count.load(Ordering::SeqCst), 3);
}

/// GET gives up after max retries and reports the last status
#[tokio::test]
async fn test_get_gives_up_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/quota"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 2);
    let err = client.get_quota().await.unwrap_err();

    assert!(err.to_string().starts_with("HTTP 500"));
}

/// GET does not retry client errors (4xx)
#[tokio::test]
async fn test_get_does_not_retry_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/sessions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error": "Unauthorized"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 3);
    let err = client.list_sessions().await.unwrap_err();

    assert_eq!(err.to_string(), "Unauthorized");
}

/// The chat POST is sent exactly once, even on 5xx
#[tokio::test]
async fn test_chat_post_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backend-llm/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"error": "Service Unavailable"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 3);
    let err = client
        .send("hi", &ModelId::from("gpt-5"), "s-1", &[])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
}
