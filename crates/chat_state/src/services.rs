//! Collaborator seams
//!
//! The orchestrator talks to the outside world only through these traits.
//! `backend_client` implements them over HTTP; tests use mocks and fakes.

use async_trait::async_trait;
use chat_core::{ConversationRecord, ModelId, QuotaSnapshot, ResponseSlots, TokenUsage};
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;

/// Result of one model call that reached the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    pub answer: Option<String>,
    /// Provider-side failure reported inside a successful response.
    pub error_message: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ModelReply {
    pub fn answer(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            answer: Some(text.into()),
            error_message: None,
            usage: Some(usage),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            answer: None,
            error_message: Some(message.into()),
            usage: None,
        }
    }
}

/// Payload for persisting a finalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub session_id: String,
    #[serde(rename = "prompt_text")]
    pub text: String,
    #[serde(rename = "llm_responses")]
    pub responses: ResponseSlots,
    pub tokens_used: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelDispatcher: Send + Sync {
    /// Send `question` to `model`, with the selected prompt fragments as context.
    async fn send(
        &self,
        question: &str,
        model: &ModelId,
        session_id: &str,
        context: &[String],
    ) -> ServiceResult<ModelReply>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, record: &NewRecord) -> ServiceResult<ConversationRecord>;

    async fn list(&self, session_id: &str) -> ServiceResult<Vec<ConversationRecord>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionMetadata: Send + Sync {
    async fn rename(&self, session_id: &str, title: &str) -> ServiceResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaSource: Send + Sync {
    async fn get(&self) -> ServiceResult<QuotaSnapshot>;
}
