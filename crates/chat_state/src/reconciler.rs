//! Optimistic cache reconciler
//!
//! The record cache holds, per session, the list of records the user sees.
//! Readers take an `Arc` snapshot; the [`Reconciler`] is the only writer and
//! every write swaps in a whole new list.

use std::sync::Arc;

use chat_core::{ConversationRecord, ResponseSlots, TokenUsage};
use dashmap::DashMap;

use crate::machine::{RecordEvent, RecordMachine, RecordState};

/// A record plus its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRecord {
    pub record: ConversationRecord,
    machine: RecordMachine,
}

impl CachedRecord {
    fn provisional(record: ConversationRecord) -> Self {
        Self {
            record,
            machine: RecordMachine::new(),
        }
    }

    fn confirmed(record: ConversationRecord) -> Self {
        Self {
            record,
            machine: RecordMachine::with_state(RecordState::Confirmed),
        }
    }

    pub fn state(&self) -> RecordState {
        self.machine.state()
    }

    pub fn machine(&self) -> &RecordMachine {
        &self.machine
    }
}

/// Per-session record lists.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: DashMap<String, Arc<Vec<CachedRecord>>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current list for `session_id`; empty if nothing is cached.
    pub fn snapshot(&self, session_id: &str) -> Arc<Vec<CachedRecord>> {
        self.entries
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_default()
    }

    pub fn records(&self, session_id: &str) -> Vec<ConversationRecord> {
        self.snapshot(session_id)
            .iter()
            .map(|cached| cached.record.clone())
            .collect()
    }

    pub fn len(&self, session_id: &str) -> usize {
        self.entries
            .get(session_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    pub fn contains_session(&self, session_id: &str) -> bool {
        self.entries.contains_key(session_id)
    }

    /// Build a new list from the current one and swap it in.
    ///
    /// `f` returns `None` to leave the entry untouched. The shard lock is held
    /// for the duration of `f`, which never awaits.
    fn update<F>(&self, session_id: &str, f: F) -> bool
    where
        F: FnOnce(&[CachedRecord]) -> Option<Vec<CachedRecord>>,
    {
        let mut entry = self.entries.entry(session_id.to_string()).or_default();
        match f(entry.value()) {
            Some(next) => {
                *entry.value_mut() = Arc::new(next);
                true
            }
            None => false,
        }
    }

    fn remove(&self, session_id: &str) {
        self.entries.remove(session_id);
    }
}

/// Sole mutator of the [`RecordCache`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    cache: Arc<RecordCache>,
}

impl Reconciler {
    pub fn new(cache: Arc<RecordCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    /// Append a freshly submitted record.
    pub fn insert_provisional(&self, record: ConversationRecord) {
        let session_id = record.session_id.clone();
        tracing::debug!(session_id = %session_id, record_id = %record.id, "inserting provisional record");
        self.cache.update(&session_id, |current| {
            let mut next = current.to_vec();
            next.push(CachedRecord::provisional(record));
            Some(next)
        });
    }

    /// Write branch responses and usage into the most recent provisional
    /// record with matching text. No-op if there is none.
    pub fn finalize_last(
        &self,
        session_id: &str,
        match_text: &str,
        responses: ResponseSlots,
        usage: TokenUsage,
    ) -> bool {
        self.cache.update(session_id, |current| {
            let index = last_matching(current, match_text, |state| state == RecordState::Provisional);
            let Some(index) = index else {
                tracing::debug!(session_id, "no provisional record to finalize");
                return None;
            };

            let mut next = current.to_vec();
            let cached = &mut next[index];
            if let Err(err) = cached.machine.handle_event(RecordEvent::Finalized) {
                tracing::warn!(session_id, record_id = %cached.record.id, "ignoring finalize: {}", err);
                return None;
            }
            cached.record.responses = responses;
            cached.record.tokens_used = usage.total_tokens;
            Some(next)
        })
    }

    /// Swap the most recent pending record with matching text for the server
    /// copy. The server copy always wins; local divergence is only logged.
    pub fn replace_with_server_record(
        &self,
        session_id: &str,
        match_text: &str,
        server: ConversationRecord,
    ) -> bool {
        self.cache.update(session_id, |current| {
            let Some(index) = last_matching(current, match_text, |state| state.is_pending()) else {
                tracing::warn!(session_id, record_id = %server.id, "no pending record to replace");
                return None;
            };

            let mut next = current.to_vec();
            let local = &next[index];
            if local.record.responses != server.responses
                || local.record.tokens_used != server.tokens_used
            {
                tracing::warn!(
                    session_id,
                    record_id = %server.id,
                    local_tokens = local.record.tokens_used,
                    server_tokens = server.tokens_used,
                    "server record diverges from local finalize, keeping server copy"
                );
            }

            let mut machine = local.machine.clone();
            if let Err(err) = machine.handle_event(RecordEvent::ServerConfirmed) {
                tracing::warn!(session_id, record_id = %local.record.id, "ignoring confirm: {}", err);
                return None;
            }

            // A refetch may already have brought the server copy in.
            let already_cached = next
                .iter()
                .any(|cached| cached.record.id == server.id);
            if already_cached {
                next.remove(index);
            } else {
                next[index] = CachedRecord {
                    record: server,
                    machine,
                };
            }
            Some(next)
        })
    }

    /// Remove the most recent pending record with matching text.
    pub fn rollback_last(&self, session_id: &str, match_text: &str) -> bool {
        self.cache.update(session_id, |current| {
            let index = last_matching(current, match_text, |state| state.is_pending())?;

            let mut machine = current[index].machine.clone();
            if let Err(err) = machine.handle_event(RecordEvent::RolledBack) {
                tracing::warn!(session_id, "ignoring rollback: {}", err);
                return None;
            }
            tracing::info!(session_id, record_id = %current[index].record.id, "rolled back provisional record");

            let mut next = current.to_vec();
            next.remove(index);
            Some(next)
        })
    }

    /// Install the server's list for a session. Records still pending stay
    /// at the tail so an in-flight submission survives the refetch.
    pub fn hydrate(&self, session_id: &str, records: Vec<ConversationRecord>) {
        self.cache.update(session_id, |current| {
            let mut next: Vec<CachedRecord> = records.into_iter().map(CachedRecord::confirmed).collect();
            let confirmed = next.len();
            next.extend(current.iter().filter(|cached| cached.state().is_pending()).cloned());
            tracing::debug!(
                session_id,
                confirmed,
                pending = next.len() - confirmed,
                "hydrated session cache"
            );
            Some(next)
        });
    }

    /// Drop everything cached for a session.
    pub fn clear(&self, session_id: &str) {
        self.cache.remove(session_id);
    }
}

fn last_matching<P>(records: &[CachedRecord], text: &str, accept: P) -> Option<usize>
where
    P: Fn(RecordState) -> bool,
{
    records
        .iter()
        .rposition(|cached| accept(cached.state()) && cached.record.text == text)
}
