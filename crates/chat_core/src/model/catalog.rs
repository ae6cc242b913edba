//! Built-in model catalog
//!
//! Mirrors the model list the chat backend accepts.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LEFT_MODEL: &str = "gpt-5";
pub const DEFAULT_RIGHT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAi,
    Google,
    Groq,
}

impl ModelProvider {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Google => "Google",
            Self::Groq => "Groq",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Flagship,
    Mini,
    Lite,
    Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: ModelProvider,
    pub description: &'static str,
    pub tier: ModelTier,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-5",
        name: "GPT-5",
        provider: ModelProvider::OpenAi,
        description: "Latest flagship model from OpenAI",
        tier: ModelTier::Flagship,
    },
    ModelInfo {
        id: "gpt-5-mini",
        name: "GPT-5 Mini",
        provider: ModelProvider::OpenAi,
        description: "Smaller, faster variant of GPT-5",
        tier: ModelTier::Mini,
    },
    ModelInfo {
        id: "gpt-nano",
        name: "GPT Nano",
        provider: ModelProvider::OpenAi,
        description: "Compact model for simple tasks",
        tier: ModelTier::Lite,
    },
    ModelInfo {
        id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        provider: ModelProvider::Google,
        description: "Google's most capable model",
        tier: ModelTier::Flagship,
    },
    ModelInfo {
        id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        provider: ModelProvider::Google,
        description: "Fast and efficient Gemini model",
        tier: ModelTier::Instant,
    },
    ModelInfo {
        id: "gemini-2.5-flash-lite",
        name: "Gemini 2.5 Flash Lite",
        provider: ModelProvider::Google,
        description: "Lightweight Gemini variant",
        tier: ModelTier::Lite,
    },
    ModelInfo {
        id: "llama-3.3-70b-versatile",
        name: "LLaMA 3.3 70B",
        provider: ModelProvider::Groq,
        description: "Powerful open-source model (70B params)",
        tier: ModelTier::Flagship,
    },
    ModelInfo {
        id: "llama-3.1-8b-instant",
        name: "LLaMA 3.1 8B",
        provider: ModelProvider::Groq,
        description: "Fast 8B parameter model",
        tier: ModelTier::Instant,
    },
];

pub(crate) fn find(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|model| model.id == id)
}

pub fn by_provider(provider: ModelProvider) -> impl Iterator<Item = &'static ModelInfo> {
    MODELS.iter().filter(move |model| model.provider == provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_catalog_and_distinct() {
        assert!(find(DEFAULT_LEFT_MODEL).is_some());
        assert!(find(DEFAULT_RIGHT_MODEL).is_some());
        assert_ne!(DEFAULT_LEFT_MODEL, DEFAULT_RIGHT_MODEL);
    }

    #[test]
    fn catalog_ids_are_unique() {
        for (i, model) in MODELS.iter().enumerate() {
            assert!(
                MODELS[i + 1..].iter().all(|other| other.id != model.id),
                "duplicate model id {}",
                model.id
            );
        }
    }

    #[test]
    fn filter_by_provider() {
        let groq: Vec<_> = by_provider(ModelProvider::Groq).map(|m| m.id).collect();
        assert_eq!(groq, vec!["llama-3.3-70b-versatile", "llama-3.1-8b-instant"]);
    }
}
