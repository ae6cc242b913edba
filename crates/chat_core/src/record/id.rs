use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved prefix of IDs minted locally before the server assigns one.
pub const PROVISIONAL_PREFIX: &str = "temp-";

/// Opaque record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh transient ID, unique within the process.
    pub fn provisional() -> Self {
        Self(format!("{}{}", PROVISIONAL_PREFIX, Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_are_prefixed_and_unique() {
        let a = RecordId::provisional();
        let b = RecordId::provisional();
        assert!(a.is_provisional());
        assert!(a.as_str().starts_with("temp-"));
        assert_ne!(a, b);
    }

    #[test]
    fn server_ids_are_not_provisional() {
        assert!(!RecordId::from("p-123").is_provisional());
    }
}
