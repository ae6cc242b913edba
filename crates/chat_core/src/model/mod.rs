//! Model module - Model identifiers and the built-in catalog

mod catalog;

pub use catalog::{by_provider, ModelInfo, ModelProvider, ModelTier, DEFAULT_LEFT_MODEL, DEFAULT_RIGHT_MODEL, MODELS};

use serde::{Deserialize, Serialize};

/// Model identifier as understood by the chat backend (e.g. `gpt-5`).
///
/// Identifiers outside the catalog are allowed; the catalog is advisory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog entry for this model, if known.
    pub fn info(&self) -> Option<&'static ModelInfo> {
        catalog::find(&self.0)
    }

    pub fn provider(&self) -> Option<ModelProvider> {
        self.info().map(|info| info.provider)
    }

    pub fn is_known(&self) -> bool {
        self.info().is_some()
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
