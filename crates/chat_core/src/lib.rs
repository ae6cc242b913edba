//! chat_core - Core types for the dual-model chat client
//!
//! This crate provides the vocabulary shared by the orchestrator, the HTTP
//! client and the CLI:
//! - `record` - ConversationRecord, RecordId, ResponseSlots
//! - `branch` - the left/right branch pair
//! - `message` - per-branch view messages
//! - `model` - model identifiers and the built-in catalog
//! - `usage` - provider usage shapes and the normalized TokenUsage
//! - `quota` - daily quota snapshot
//! - `session` - chat sessions, titles and date grouping
//! - `library` - system and user prompt fragments
//! - `config` / `paths` - configuration loading and app directory layout

pub mod branch;
pub mod config;
pub mod error;
pub mod library;
pub mod message;
pub mod model;
pub mod paths;
pub mod quota;
pub mod record;
pub mod session;
pub mod time;
pub mod usage;

// Re-export commonly used types
pub use branch::Branch;
pub use config::{Config, HttpConfig, QuotaConfig};
pub use error::{ConfigError, Result};
pub use library::{SystemPrompt, UserPrompt};
pub use message::{BranchMessage, MessageRole};
pub use model::{ModelId, ModelInfo, ModelProvider, ModelTier, DEFAULT_LEFT_MODEL, DEFAULT_RIGHT_MODEL};
pub use quota::QuotaSnapshot;
pub use record::{ConversationRecord, RecordId, ResponseSlots, PROVISIONAL_PREFIX};
pub use session::{derive_title, ChatSession, GroupedSessions, SessionGroup};
pub use usage::{ProviderUsage, TokenUsage};
