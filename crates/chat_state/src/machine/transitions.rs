//! State transitions - record lifecycle transition logic

use thiserror::Error;

use super::events::RecordEvent;
use super::states::RecordState;

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from} with event {event}")]
    InvalidTransition { from: RecordState, event: RecordEvent },

    #[error("Record is in terminal state: {0}")]
    TerminalState(RecordState),
}

/// Represents a state transition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: RecordState,
    pub to: RecordState,
    pub event: RecordEvent,
}

/// Lifecycle tracker attached to each cached record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMachine {
    current_state: RecordState,
    history: Vec<StateTransition>,
}

impl Default for RecordMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordMachine {
    /// Start a freshly submitted record.
    pub fn new() -> Self {
        Self::with_state(RecordState::Provisional)
    }

    /// Start from a known state, e.g. `Confirmed` for records fetched from the server.
    pub fn with_state(state: RecordState) -> Self {
        Self {
            current_state: state,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> RecordState {
        self.current_state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Apply an event. On error the state is left untouched.
    pub fn handle_event(&mut self, event: RecordEvent) -> Result<StateTransition, TransitionError> {
        let from = self.current_state;
        let to = Self::compute_next_state(from, event)?;
        self.current_state = to;

        let transition = StateTransition { from, to, event };
        self.history.push(transition);
        Ok(transition)
    }

    /// Check if a transition is valid without executing it.
    pub fn can_transition(&self, event: RecordEvent) -> bool {
        Self::compute_next_state(self.current_state, event).is_ok()
    }

    fn compute_next_state(
        state: RecordState,
        event: RecordEvent,
    ) -> Result<RecordState, TransitionError> {
        use RecordEvent as E;
        use RecordState::*;

        match (state, event) {
            (Provisional, E::Finalized) => Ok(FinalizedLocally),
            (Provisional | FinalizedLocally, E::ServerConfirmed) => Ok(Confirmed),
            (Provisional | FinalizedLocally, E::RolledBack) => Ok(RolledBack),
            (Confirmed | RolledBack, _) => Err(TransitionError::TerminalState(state)),
            (from, event) => Err(TransitionError::InvalidTransition { from, event }),
        }
    }
}
