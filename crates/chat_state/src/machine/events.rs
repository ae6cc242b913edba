//! Record events - what the reconciler reports about a cached record

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordEvent {
    /// Branch responses and usage written into the provisional record.
    Finalized,

    /// The server accepted the record and returned its copy.
    ServerConfirmed,

    /// Persisting failed and the record was dropped.
    RolledBack,
}

impl std::fmt::Display for RecordEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Finalized => "finalized",
            Self::ServerConfirmed => "server_confirmed",
            Self::RolledBack => "rolled_back",
        };
        f.write_str(name)
    }
}
