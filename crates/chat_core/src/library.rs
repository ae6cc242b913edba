//! Prompt library - reusable prompt fragments sent as chat context

use serde::{Deserialize, Serialize};

use crate::time::null_as_default;

/// Curated prompt provided by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub prompt_id: String,
    pub prompt_text: String,
}

/// Prompt saved by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrompt {
    pub prompt_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    pub prompt_text: String,
}
