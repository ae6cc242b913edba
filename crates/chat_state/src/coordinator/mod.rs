//! Dispatch coordinator
//!
//! Sends one user message to both branch models at once and routes the
//! outcome through the reconciler. Per-branch failures are state, not
//! errors: `submit` only reports what happened.

use std::sync::Arc;

use chat_core::{
    derive_title, Branch, ConversationRecord, ModelId, ResponseSlots, TokenUsage,
};
use parking_lot::Mutex;

use crate::branch::{BranchDispatchState, DualBranchState};
use crate::error::{SelectionError, ServiceResult};
use crate::materializer::{materialize, BranchTimelines};
use crate::notice::Notice;
use crate::quota::QuotaMonitor;
use crate::reconciler::Reconciler;
use crate::selection::ModelSelection;
use crate::services::{ConversationStore, ModelDispatcher, ModelReply, NewRecord, SessionMetadata};

/// External collaborators used by the coordinator.
#[derive(Clone)]
pub struct Services {
    pub dispatcher: Arc<dyn ModelDispatcher>,
    pub store: Arc<dyn ConversationStore>,
    pub sessions: Arc<dyn SessionMetadata>,
}

/// Why a submit never left the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoSession,
    EmptyMessage,
    QuotaExceeded { used_today: u64, daily_limit: u64 },
}

/// Branch errors left behind by one submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchErrors {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl BranchErrors {
    pub fn get(&self, branch: Branch) -> Option<&str> {
        match branch {
            Branch::Left => self.left.as_deref(),
            Branch::Right => self.right.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(Rejection),
    /// Persisted; the cache now holds the server copy.
    Saved {
        record: ConversationRecord,
        errors: BranchErrors,
    },
    /// Persisting failed and the provisional record was removed.
    RolledBack { error: String },
}

/// What one branch contributed once its call settled.
#[derive(Debug, Default)]
struct BranchResult {
    response: String,
    usage: TokenUsage,
    error: Option<String>,
}

impl BranchResult {
    fn from_reply(branch: Branch, reply: ServiceResult<ModelReply>) -> Self {
        match reply {
            Ok(reply) => {
                let usage = reply.usage.unwrap_or_default();
                match (reply.answer, reply.error_message) {
                    (Some(answer), _) if !answer.is_empty() => Self {
                        response: answer,
                        usage,
                        error: None,
                    },
                    (_, Some(message)) if !message.is_empty() => Self {
                        response: String::new(),
                        usage,
                        error: Some(message),
                    },
                    _ => {
                        tracing::warn!(branch = %branch, "model returned neither answer nor error");
                        Self {
                            usage,
                            ..Self::default()
                        }
                    }
                }
            }
            Err(err) => {
                let message = err.to_string();
                let message = if message.is_empty() {
                    format!("Failed to get response from {} model", branch)
                } else {
                    message
                };
                Self {
                    error: Some(message),
                    ..Self::default()
                }
            }
        }
    }
}

pub struct DispatchCoordinator {
    services: Services,
    reconciler: Reconciler,
    quota: Arc<QuotaMonitor>,
    branches: Mutex<DualBranchState>,
    context: Mutex<Vec<String>>,
    title_max_chars: usize,
}

impl DispatchCoordinator {
    pub fn new(
        services: Services,
        reconciler: Reconciler,
        quota: Arc<QuotaMonitor>,
        selection: &ModelSelection,
    ) -> Self {
        Self {
            services,
            reconciler,
            quota,
            branches: Mutex::new(DualBranchState::from_selection(selection)),
            context: Mutex::new(Vec::new()),
            title_max_chars: chat_core::session::DEFAULT_TITLE_CHARS,
        }
    }

    pub fn with_title_max_chars(mut self, max_chars: usize) -> Self {
        self.title_max_chars = max_chars;
        self
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn quota(&self) -> &Arc<QuotaMonitor> {
        &self.quota
    }

    pub fn branch_state(&self, branch: Branch) -> BranchDispatchState {
        self.branches.lock().get(branch).clone()
    }

    pub fn model(&self, branch: Branch) -> ModelId {
        self.branches.lock().model(branch).clone()
    }

    pub fn is_loading(&self) -> bool {
        self.branches.lock().is_loading()
    }

    /// Change a branch's model. Refused when the other branch already uses it.
    pub fn select_model(&self, branch: Branch, model: ModelId) -> Result<(), SelectionError> {
        self.branches.lock().set_model(branch, model)
    }

    /// Prompt fragments sent as context with every model call.
    pub fn set_context_fragments(&self, fragments: Vec<String>) {
        *self.context.lock() = fragments;
    }

    /// Both timelines for a session, tagged with the current models.
    pub fn timelines(&self, session_id: &str) -> BranchTimelines {
        let records = self.reconciler.cache().records(session_id);
        let (left, right) = {
            let branches = self.branches.lock();
            (branches.model(Branch::Left).clone(), branches.model(Branch::Right).clone())
        };
        materialize(&records, &left, &right)
    }

    /// Fetch a session's records from the server into the cache.
    pub async fn load_history(&self, session_id: &str) -> ServiceResult<usize> {
        let records = self.services.store.list(session_id).await?;
        let count = records.len();
        self.reconciler.hydrate(session_id, records);
        Ok(count)
    }

    pub async fn submit(&self, text: &str, session_id: Option<&str>) -> SubmitOutcome {
        let Some(session_id) = session_id else {
            tracing::warn!("submit ignored: no session selected");
            return SubmitOutcome::Rejected(Rejection::NoSession);
        };
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(session_id, "submit ignored: empty message");
            return SubmitOutcome::Rejected(Rejection::EmptyMessage);
        }
        if let Some(snapshot) = self.quota.snapshot().filter(|s| s.is_exhausted()) {
            tracing::warn!(
                session_id,
                used_today = snapshot.used_today,
                daily_limit = snapshot.daily_limit,
                "submit refused: daily quota exhausted"
            );
            self.quota.emit(Notice::QuotaExceeded {
                used_today: snapshot.used_today,
                daily_limit: snapshot.daily_limit,
            });
            return SubmitOutcome::Rejected(Rejection::QuotaExceeded {
                used_today: snapshot.used_today,
                daily_limit: snapshot.daily_limit,
            });
        }

        let is_first = self.reconciler.cache().is_empty(session_id);
        self.reconciler
            .insert_provisional(ConversationRecord::provisional(session_id, text));

        let (left_model, right_model) = {
            let mut branches = self.branches.lock();
            branches.begin_dispatch();
            (branches.model(Branch::Left).clone(), branches.model(Branch::Right).clone())
        };

        if is_first {
            self.spawn_rename(session_id, derive_title(text, self.title_max_chars));
        }

        let context = self.context.lock().clone();
        tracing::info!(
            session_id,
            left = %left_model,
            right = %right_model,
            fragments = context.len(),
            "dispatching to both branches"
        );

        let (left, right) = tokio::join!(
            self.dispatch_branch(Branch::Left, &left_model, text, session_id, &context),
            self.dispatch_branch(Branch::Right, &right_model, text, session_id, &context),
        );

        let usage = left.usage + right.usage;
        let responses = ResponseSlots::new(left.response, right.response);
        let errors = BranchErrors {
            left: left.error,
            right: right.error,
        };
        self.reconciler
            .finalize_last(session_id, text, responses.clone(), usage);

        let new_record = NewRecord {
            session_id: session_id.to_string(),
            text: text.to_string(),
            responses,
            tokens_used: usage.total_tokens,
        };
        match self.services.store.create(&new_record).await {
            Ok(server) => {
                tracing::info!(
                    session_id,
                    record_id = %server.id,
                    tokens_used = usage.total_tokens,
                    "saved dual response"
                );
                self.reconciler
                    .replace_with_server_record(session_id, text, server.clone());
                self.spawn_quota_refresh();
                SubmitOutcome::Saved {
                    record: server,
                    errors,
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(session_id, "failed to save prompt: {}", message);
                self.reconciler.rollback_last(session_id, text);
                self.branches.lock().fail_both(&message);
                SubmitOutcome::RolledBack { error: message }
            }
        }
    }

    /// One branch call. Settles that branch's state as soon as it resolves,
    /// independently of the other branch.
    async fn dispatch_branch(
        &self,
        branch: Branch,
        model: &ModelId,
        text: &str,
        session_id: &str,
        context: &[String],
    ) -> BranchResult {
        let reply = self
            .services
            .dispatcher
            .send(text, model, session_id, context)
            .await;
        if let Err(err) = &reply {
            tracing::warn!(branch = %branch, model = %model, "model call failed: {}", err);
        }

        let result = BranchResult::from_reply(branch, reply);
        self.branches.lock().settle(branch, result.error.clone());
        result
    }

    fn spawn_rename(&self, session_id: &str, title: String) {
        let sessions = Arc::clone(&self.services.sessions);
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = sessions.rename(&session_id, &title).await {
                tracing::warn!(session_id = %session_id, "failed to rename session: {}", err);
            }
        });
    }

    fn spawn_quota_refresh(&self) {
        let quota = Arc::clone(&self.quota);
        tokio::spawn(async move {
            if let Err(err) = quota.refresh().await {
                tracing::warn!("quota refresh after submit failed: {}", err);
            }
        });
    }
}
