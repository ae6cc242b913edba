//! Orchestrator service traits implemented over HTTP

use async_trait::async_trait;
use chat_core::{ConversationRecord, ModelId, QuotaSnapshot};
use chat_state::{
    ConversationStore, ModelDispatcher, ModelReply, NewRecord, QuotaSource, ServiceResult,
    SessionMetadata,
};

use crate::api::types::{ChatRequest, ChatResponse};
use crate::client::BackendClient;

impl From<ChatResponse> for ModelReply {
    fn from(response: ChatResponse) -> Self {
        ModelReply {
            answer: response.answer,
            error_message: response.error_message,
            usage: response.usage.map(|usage| usage.normalize()),
        }
    }
}

#[async_trait]
impl ModelDispatcher for BackendClient {
    async fn send(
        &self,
        question: &str,
        model: &ModelId,
        session_id: &str,
        context: &[String],
    ) -> ServiceResult<ModelReply> {
        let request = ChatRequest {
            question: question.to_string(),
            model: model.as_str().to_string(),
            session_id: session_id.to_string(),
            chat_history: Vec::new(),
            system_prompts: context.to_vec(),
        };
        let response = self.send_chat(&request).await?;
        if let Some(latency) = response.latency_ms {
            log::debug!("{} answered in {}ms", model, latency);
        }
        Ok(response.into())
    }
}

#[async_trait]
impl ConversationStore for BackendClient {
    async fn create(&self, record: &NewRecord) -> ServiceResult<ConversationRecord> {
        Ok(self.create_record(record).await?)
    }

    async fn list(&self, session_id: &str) -> ServiceResult<Vec<ConversationRecord>> {
        Ok(self.list_records(session_id).await?)
    }
}

#[async_trait]
impl SessionMetadata for BackendClient {
    async fn rename(&self, session_id: &str, title: &str) -> ServiceResult<()> {
        self.update_session(session_id, title).await?;
        Ok(())
    }
}

#[async_trait]
impl QuotaSource for BackendClient {
    async fn get(&self) -> ServiceResult<QuotaSnapshot> {
        Ok(self.get_quota().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{ProviderUsage, TokenUsage};

    #[test]
    fn reply_normalizes_usage() {
        let response = ChatResponse {
            answer: Some("4".to_string()),
            error_message: None,
            model: Some("gemini-2.5-flash".to_string()),
            provider: Some("google".to_string()),
            latency_ms: None,
            usage: Some(ProviderUsage::GeminiStyle {
                prompt_token_count: Some(4),
                candidates_token_count: Some(1),
                total_token_count: None,
            }),
        };
        let reply = ModelReply::from(response);
        assert_eq!(reply.usage, Some(TokenUsage::new(5)));
        assert_eq!(reply.answer.as_deref(), Some("4"));
    }
}
