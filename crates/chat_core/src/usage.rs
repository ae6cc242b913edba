//! Token usage
//!
//! Providers report usage under different field names. The shapes are
//! captured as [`ProviderUsage`] and normalized once, at the dispatch
//! boundary, into [`TokenUsage`].

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical usage shape consumed by the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(total_tokens: u64) -> Self {
        Self { total_tokens }
    }
}

impl std::ops::Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, rhs: TokenUsage) -> TokenUsage {
        TokenUsage {
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        *self = *self + rhs;
    }
}

/// Provider-specific usage payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderUsage {
    /// OpenAI and Groq: `prompt_tokens` / `completion_tokens` / `total_tokens`
    OpenAiStyle {
        prompt_tokens: Option<u64>,
        completion_tokens: Option<u64>,
        total_tokens: Option<u64>,
    },
    /// Gemini: `prompt_token_count` / `candidates_token_count` / `total_token_count`
    GeminiStyle {
        prompt_token_count: Option<u64>,
        candidates_token_count: Option<u64>,
        total_token_count: Option<u64>,
    },
    /// An object with none of the known fields
    Unreported,
}

impl ProviderUsage {
    /// Total tokens, summing the parts when the provider omitted the total.
    pub fn total_tokens(&self) -> u64 {
        match *self {
            Self::OpenAiStyle {
                prompt_tokens,
                completion_tokens,
                total_tokens,
            } => total_tokens.unwrap_or_else(|| {
                prompt_tokens
                    .unwrap_or(0)
                    .saturating_add(completion_tokens.unwrap_or(0))
            }),
            Self::GeminiStyle {
                prompt_token_count,
                candidates_token_count,
                total_token_count,
            } => total_token_count.unwrap_or_else(|| {
                prompt_token_count
                    .unwrap_or(0)
                    .saturating_add(candidates_token_count.unwrap_or(0))
            }),
            Self::Unreported => 0,
        }
    }

    pub fn normalize(&self) -> TokenUsage {
        TokenUsage::new(self.total_tokens())
    }
}

#[derive(Deserialize, Default)]
struct RawUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

impl From<RawUsage> for ProviderUsage {
    fn from(raw: RawUsage) -> Self {
        if raw.prompt_tokens.is_some() || raw.completion_tokens.is_some() || raw.total_tokens.is_some() {
            Self::OpenAiStyle {
                prompt_tokens: raw.prompt_tokens,
                completion_tokens: raw.completion_tokens,
                total_tokens: raw.total_tokens,
            }
        } else if raw.prompt_token_count.is_some()
            || raw.candidates_token_count.is_some()
            || raw.total_token_count.is_some()
        {
            Self::GeminiStyle {
                prompt_token_count: raw.prompt_token_count,
                candidates_token_count: raw.candidates_token_count,
                total_token_count: raw.total_token_count,
            }
        } else {
            Self::Unreported
        }
    }
}

impl<'de> Deserialize<'de> for ProviderUsage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawUsage::deserialize(deserializer).map(Self::from)
    }
}
