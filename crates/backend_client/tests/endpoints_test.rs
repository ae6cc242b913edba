//! Endpoint shapes against a mock backend


use backend_client::ClientError;
use chat_core::{Branch, ModelId, ResponseSlots, TokenUsage};
use chat_state::{ConversationStore, ModelDispatcher, NewRecord, QuotaSource, SessionMetadata};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::client_for;

#[tokio::test]
async fn test_chat_sends_context_and_normalizes_openai_usage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backend-llm/chat"))
        .and(body_json(json!({
            "question": "What is 2+2?",
            "model": "gpt-5",
            "session_id": "s-1",
            "chat_history": [],
            "system_prompts": ["be brief"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "4",
            "session_id": "s-1",
            "model": "gpt-5",
            "provider": "openai",
            "latency_ms": 812,
            "usage": {"prompt_tokens": 8, "completion_tokens": 4, "total_tokens": 12}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);
    let reply = client
        .send("What is 2+2?", &ModelId::from("gpt-5"), "s-1", &["be brief".to_string()])
        .await
        .unwrap();

    assert_eq!(reply.answer.as_deref(), Some("4"));
    assert_eq!(reply.usage, Some(TokenUsage::new(12)));
}

#[tokio::test]
async fn test_chat_normalizes_gemini_usage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backend-llm/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "four",
            "usage": {"prompt_token_count": 6, "candidates_token_count": 3, "total_token_count": 9}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);
    let reply = client
        .send("2+2?", &ModelId::from("gemini-2.5-flash"), "s-1", &[])
        .await
        .unwrap();

    assert_eq!(reply.usage, Some(TokenUsage::new(9)));
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backend-llm/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "error": "Upstream failure",
            "detail": "Model gemini-2.5-flash is overloaded"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);
    let err = client
        .send("hi", &ModelId::from("gemini-2.5-flash"), "s-1", &[])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Model gemini-2.5-flash is overloaded");
}

#[tokio::test]
async fn test_error_without_body_uses_status_line() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/quota"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);
    let err = client.get_quota().await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "HTTP 404: Not Found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_and_list_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backend-da/prompts"))
        .and(body_json(json!({
            "session_id": "s-1",
            "prompt_text": "What is 2+2?",
            "llm_responses": ["4", ""],
            "tokens_used": 12
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "prompt_id": "p-2",
            "user_id": "u-1",
            "session_id": "s-1",
            "prompt_text": "What is 2+2?",
            "llm_responses": ["4", ""],
            "tokens_used": 12,
            "timestamp": "2025-06-15T12:00:00.123456"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/prompts"))
        .and(query_param("session_id", "s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "prompt_id": "p-1",
            "user_id": "u-1",
            "session_id": "s-1",
            "prompt_text": "Hello",
            "llm_responses": ["Hi"],
            "timestamp": "2025-06-15T11:00:00Z"
        }])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);
    let created = client
        .create(&NewRecord {
            session_id: "s-1".to_string(),
            text: "What is 2+2?".to_string(),
            responses: ResponseSlots::new("4", ""),
            tokens_used: 12,
        })
        .await
        .unwrap();
    assert_eq!(created.id.as_str(), "p-2");

    let records = client.list("s-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].responses.get(Branch::Right), "");
    assert_eq!(records[0].tokens_used, 0);
}

#[tokio::test]
async fn test_rename_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/backend-da/sessions/s-9"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-internal-api-key", "internal"))
        .and(body_json(json!({"title": "What is 2+2?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s-9",
            "user_id": "u-1",
            "title": "What is 2+2?",
            "created_at": "2025-06-15T10:00:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = chat_core::Config {
        backend_url: mock_server.uri(),
        auth_token: Some("secret".to_string()),
        internal_api_key: Some("internal".to_string()),
        ..chat_core::Config::default()
    };
    let client = backend_client::BackendClient::new(&config).unwrap();

    client.rename("s-9", "What is 2+2?").await.unwrap();
}

#[tokio::test]
async fn test_quota_and_prompt_library() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/quota"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "u-1",
            "daily_limit": 1000,
            "used_today": 850,
            "last_reset": "2025-06-15T00:00:00",
            "quota_remaining": 150
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/backend-da/system-prompts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"prompt_id": "sys-1", "prompt_text": "Be concise."}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/backend-da/user-prompts"))
        .and(query_param("id", "up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri(), 0);

    let quota = QuotaSource::get(&client).await.unwrap();
    assert_eq!(quota.percentage(), 85);
    assert!(!quota.is_exhausted());

    let prompts = client.list_system_prompts().await.unwrap();
    assert_eq!(prompts[0].prompt_text, "Be concise.");

    let deleted = client.delete_user_prompt("up-1").await.unwrap();
    assert_eq!(deleted.message, "deleted");
}
