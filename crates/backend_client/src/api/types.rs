//! Wire types of the backend-for-frontend API
//!
//! Domain payloads (records, sessions, quota, prompts) reuse the
//! `chat_core` types directly; only request bodies and envelopes live here.

use chat_core::ProviderUsage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub question: String,
    pub model: String,
    pub session_id: String,
    /// Always sent empty: each call is a fresh question.
    pub chat_history: Vec<ChatTurn>,
    pub system_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub usage: Option<ProviderUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTitle<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUserPrompt<'a> {
    pub prompt_text: &'a str,
}

/// Body of DELETE responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error envelope: `{ "error": ..., "detail": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// `detail`, else `error`, ignoring blanks.
    pub fn message(&self) -> Option<&str> {
        [self.detail.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}
