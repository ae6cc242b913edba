//! Conversation records
//!
//! A record is one user submission plus the two model responses. It is the
//! unit the data backend stores and the unit the local cache holds.

mod id;
mod slots;

pub use id::{RecordId, PROVISIONAL_PREFIX};
pub use slots::ResponseSlots;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{deserialize_utc, null_as_default};

/// User ID carried by records that have not reached the server.
pub const PROVISIONAL_USER: &str = "temp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(rename = "prompt_id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    pub session_id: String,
    #[serde(rename = "prompt_text")]
    pub text: String,
    #[serde(rename = "llm_responses", default, deserialize_with = "null_as_default")]
    pub responses: ResponseSlots,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens_used: u64,
    #[serde(deserialize_with = "deserialize_utc")]
    pub timestamp: DateTime<Utc>,
}

impl ConversationRecord {
    /// Local placeholder for a submission: transient ID, empty slots, zero usage.
    pub fn provisional(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: RecordId::provisional(),
            user_id: PROVISIONAL_USER.to_string(),
            session_id: session_id.into(),
            text: text.into(),
            responses: ResponseSlots::default(),
            tokens_used: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}
