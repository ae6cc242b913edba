//! Error types for the orchestrator

use chat_core::ModelId;
use thiserror::Error;

/// Failure reported by an external collaborator.
///
/// `Display` is the user-facing text that lands in branch error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Model {0} is already selected on the other branch")]
    SameModel(ModelId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_bare_message() {
        let err = ServiceError::Api {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn network_error_is_prefixed() {
        let err = ServiceError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.status(), None);
    }
}
