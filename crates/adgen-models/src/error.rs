//! Input validation errors.

use thiserror::Error;

/// Result type for capability checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Raised before any network call when the supplied media does not fit the
/// selected model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This model needs at least {min} image(s), got {got}")]
    TooFewImages { min: u32, got: u32 },

    #[error("This model accepts at most {max} image(s), got {got}")]
    TooManyImages { max: u32, got: u32 },

    #[error("This model needs a reference video")]
    MissingReferenceVideo,
}
