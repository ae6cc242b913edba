use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::branch::Branch;
use crate::model::ModelId;
use crate::record::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry of a branch timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set on assistant messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
}

impl BranchMessage {
    pub fn user(record_id: &RecordId, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("user-{}", record_id),
            role: MessageRole::User,
            content: content.into(),
            timestamp,
            model: None,
        }
    }

    pub fn assistant(
        branch: Branch,
        record_id: &RecordId,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        model: ModelId,
    ) -> Self {
        Self {
            id: format!("assistant-{}-{}", branch, record_id),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
            model: Some(model),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_per_record_and_branch() {
        let id = RecordId::from("p-7");
        let now = Utc::now();
        assert_eq!(BranchMessage::user(&id, "hi", now).id, "user-p-7");
        let left = BranchMessage::assistant(Branch::Left, &id, "yo", now, ModelId::from("gpt-5"));
        let right = BranchMessage::assistant(Branch::Right, &id, "yo", now, ModelId::from("gpt-5"));
        assert_eq!(left.id, "assistant-left-p-7");
        assert_eq!(right.id, "assistant-right-p-7");
        assert!(!left.is_user());
    }
}
