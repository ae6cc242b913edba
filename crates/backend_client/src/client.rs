use std::time::Duration;

use chat_core::{
    ChatSession, Config, ConversationRecord, HttpConfig, QuotaSnapshot, SystemPrompt, UserPrompt,
};
use chat_state::NewRecord;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::routes;
use crate::api::types::{
    ApiErrorBody, ChatRequest, ChatResponse, MessageResponse, NewUserPrompt, SessionTitle,
};
use crate::error::{ClientError, Result};

const INTERNAL_API_KEY_HEADER: &str = "X-Internal-API-Key";

/// Client for the backend-for-frontend API.
///
/// GETs go through a retrying middleware client. Writes and chat calls use
/// the plain client so a request is never repeated behind the caller's back.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
    retrying: ClientWithMiddleware,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self> {
        let headers = Self::default_headers(
            config.auth_token.as_deref(),
            config.internal_api_key.as_deref(),
        )?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .default_headers(headers)
            .build()?;
        Ok(Self::with_client(&config.backend_url, http, &config.http))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(base_url: &str, http: Client, http_config: &HttpConfig) -> Self {
        let retrying = Self::build_retry_client(http.clone(), http_config);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            retrying,
        }
    }

    fn default_headers(auth_token: Option<&str>, internal_key: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(key) = internal_key.filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(INTERNAL_API_KEY_HEADER, value);
        }
        Ok(headers)
    }

    fn build_retry_client(client: Client, http_config: &HttpConfig) -> ClientWithMiddleware {
        // Exponential backoff starting at retry_base_ms, with jitter
        let base = Duration::from_millis(http_config.retry_base_ms.max(1));
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(base, base * 8)
            .build_with_max_retries(http_config.max_retries);

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}", path);
        let response = self
            .retrying
            .get(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, path);
        let mut request = self.http.request(method, self.url(path)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = body.message().map(str::to_string).unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
            warn!("Backend returned {}: {}", status.as_u16(), message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ---- LLM ----

    /// Ask one model. Never retried.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.send_json(Method::POST, routes::CHAT, &[], Some(request))
            .await
    }

    // ---- Sessions ----

    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        self.get_json(routes::SESSIONS, &[]).await
    }

    pub async fn create_session(&self, title: &str) -> Result<ChatSession> {
        self.send_json(Method::POST, routes::SESSIONS, &[], Some(&SessionTitle { title }))
            .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<ChatSession> {
        self.get_json(&format!("{}/{}", routes::SESSIONS, session_id), &[])
            .await
    }

    pub async fn update_session(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        self.send_json(
            Method::PUT,
            &format!("{}/{}", routes::SESSIONS, session_id),
            &[],
            Some(&SessionTitle { title }),
        )
        .await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<MessageResponse> {
        self.send_json::<(), _>(
            Method::DELETE,
            &format!("{}/{}", routes::SESSIONS, session_id),
            &[],
            None,
        )
        .await
    }

    // ---- Records ----

    pub async fn list_records(&self, session_id: &str) -> Result<Vec<ConversationRecord>> {
        self.get_json(routes::PROMPTS, &[("session_id", session_id)])
            .await
    }

    pub async fn create_record(&self, record: &NewRecord) -> Result<ConversationRecord> {
        self.send_json(Method::POST, routes::PROMPTS, &[], Some(record))
            .await
    }

    // ---- Quota ----

    pub async fn get_quota(&self) -> Result<QuotaSnapshot> {
        self.get_json(routes::QUOTA, &[]).await
    }

    // ---- Prompt library ----

    pub async fn list_system_prompts(&self) -> Result<Vec<SystemPrompt>> {
        self.get_json(routes::SYSTEM_PROMPTS, &[]).await
    }

    pub async fn list_user_prompts(&self) -> Result<Vec<UserPrompt>> {
        self.get_json(routes::USER_PROMPTS, &[]).await
    }

    pub async fn create_user_prompt(&self, prompt_text: &str) -> Result<UserPrompt> {
        self.send_json(
            Method::POST,
            routes::USER_PROMPTS,
            &[],
            Some(&NewUserPrompt { prompt_text }),
        )
        .await
    }

    pub async fn delete_user_prompt(&self, prompt_id: &str) -> Result<MessageResponse> {
        self.send_json::<(), _>(Method::DELETE, routes::USER_PROMPTS, &[("id", prompt_id)], None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_only_when_configured() {
        let headers = BackendClient::default_headers(None, Some("")).unwrap();
        assert!(headers.is_empty());

        let headers = BackendClient::default_headers(Some("tok"), Some("key")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(headers.get(INTERNAL_API_KEY_HEADER).unwrap(), "key");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let result = BackendClient::default_headers(Some("bad\ntoken"), None);
        assert!(matches!(result, Err(ClientError::InvalidHeader(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = BackendClient::with_client(
            "http://localhost:3000/",
            Client::new(),
            &HttpConfig::default(),
        );
        assert_eq!(client.url(routes::QUOTA), "http://localhost:3000/api/backend-da/quota");
    }
}
