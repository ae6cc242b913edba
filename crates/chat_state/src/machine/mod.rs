//! State machine module
//!
//! Lifecycle of a cached conversation record:
//! provisional -> finalized locally -> confirmed, or rolled back from
//! either pending state.

mod events;
mod states;
mod transitions;

pub use events::RecordEvent;
pub use states::RecordState;
pub use transitions::{RecordMachine, StateTransition, TransitionError};
