//! Record states - lifecycle of a cached conversation record

use serde::{Deserialize, Serialize};

/// Where a cached record stands relative to the server.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Inserted on submit, both branch calls still in flight.
    Provisional,

    /// Both branches settled, responses written locally, not yet persisted.
    FinalizedLocally,

    /// Replaced by the server copy.
    Confirmed,

    /// Removed after a failed persist.
    RolledBack,
}

impl RecordState {
    /// Whether the record still carries a transient ID.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Provisional | Self::FinalizedLocally)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::RolledBack)
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Provisional => "provisional",
            Self::FinalizedLocally => "finalized_locally",
            Self::Confirmed => "confirmed",
            Self::RolledBack => "rolled_back",
        };
        f.write_str(name)
    }
}
