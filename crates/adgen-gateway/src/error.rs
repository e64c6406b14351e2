//! Gateway error types.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while talking to a provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid API key.")]
    InvalidApiKey,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("No taskId in {0} response.")]
    NoTaskId(String),

    #[error("No result URL: {0}")]
    NoResultUrl(String),

    #[error("No content in chat response: {0}")]
    EmptyContent(String),

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to an error. 401 is always an auth failure.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => Self::InvalidApiKey,
            _ => Self::Provider {
                status,
                message: message.into(),
            },
        }
    }

    /// HTTP status reported by the provider, when there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GatewayError::InvalidApiKey => Some(401),
            GatewayError::Provider { status, .. } => Some(*status),
            GatewayError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, GatewayError::InvalidApiKey)
    }
}
