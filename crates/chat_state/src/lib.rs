//! chat_state - Dual-model chat orchestration
//!
//! This crate owns the client-side state of a dual-model conversation:
//! - `coordinator` - sends one message to both branch models and settles the results
//! - `reconciler` - the optimistic record cache and its only writer
//! - `materializer` - per-branch timelines derived from cached records
//! - `machine` - lifecycle state machine of a cached record
//! - `selection` - model and prompt-fragment selection, persisted as preferences
//! - `quota` - quota snapshot, refresh and near-limit notices
//! - `services` - traits for the backend collaborators

pub mod branch;
pub mod coordinator;
pub mod error;
pub mod machine;
pub mod materializer;
pub mod notice;
pub mod quota;
pub mod reconciler;
pub mod selection;
pub mod services;

// Re-export commonly used types
pub use branch::{BranchDispatchState, DualBranchState};
pub use coordinator::{BranchErrors, DispatchCoordinator, Rejection, Services, SubmitOutcome};
pub use error::{SelectionError, ServiceError, ServiceResult};
pub use machine::{RecordEvent, RecordMachine, RecordState, StateTransition, TransitionError};
pub use materializer::{materialize, BranchTimelines};
pub use notice::{Notice, NoticeBus};
pub use quota::QuotaMonitor;
pub use reconciler::{CachedRecord, RecordCache, Reconciler};
pub use selection::{ModelSelection, Preferences, PromptSelection};
pub use services::{ConversationStore, ModelDispatcher, ModelReply, NewRecord, QuotaSource, SessionMetadata};
