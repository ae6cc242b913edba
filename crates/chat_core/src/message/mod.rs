//! Message module - per-branch view messages
//!
//! View messages are derived from conversation records for display and are
//! never stored.

mod view;

pub use view::{BranchMessage, MessageRole};
