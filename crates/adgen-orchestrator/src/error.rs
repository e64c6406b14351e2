//! Orchestrator error types.

use adgen_gateway::GatewayError;
use adgen_models::ValidationError;
use thiserror::Error;

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Invalid API key.")]
    InvalidApiKey,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("No taskId in {0} response.")]
    NoTaskId(String),

    #[error("No result URL: {0}")]
    NoResultUrl(String),

    #[error("{0}")]
    JobFailed(String),

    #[error("Video not ready yet. Try again later.")]
    JobNotReady,

    #[error("Video generation timed out after {attempts} status checks.")]
    Timeout { attempts: u32 },

    #[error("No video prompt from idea step: {0}")]
    EmptyExpansion(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Provider(GatewayError),
}

impl OrchestratorError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn no_result_url(msg: impl Into<String>) -> Self {
        Self::NoResultUrl(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP-equivalent status for callers that front the orchestrator with HTTP.
    pub fn http_status(&self) -> u16 {
        match self {
            OrchestratorError::InvalidApiKey => 401,
            OrchestratorError::Validation(_) => 400,
            OrchestratorError::JobNotReady => 404,
            _ => 500,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, OrchestratorError::InvalidApiKey)
    }
}

impl From<GatewayError> for OrchestratorError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidApiKey => Self::InvalidApiKey,
            GatewayError::UploadFailed(msg) => Self::UploadFailed(msg),
            GatewayError::NoTaskId(msg) => Self::NoTaskId(msg),
            GatewayError::NoResultUrl(msg) => Self::NoResultUrl(msg),
            GatewayError::EmptyContent(msg) => Self::EmptyExpansion(msg),
            other => Self::Provider(other),
        }
    }
}
