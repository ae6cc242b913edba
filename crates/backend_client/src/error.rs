use chat_state::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Non-2xx answer; `message` is what the backend said went wrong.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => ServiceError::Api { status, message },
            ClientError::Json(err) => ServiceError::Decode(err.to_string()),
            ClientError::Http(err) => ServiceError::Network(err.to_string()),
            ClientError::Middleware(err) => ServiceError::Network(err.to_string()),
            ClientError::InvalidHeader(err) => ServiceError::Other(err.to_string()),
        }
    }
}
