//! User-facing generation errors

use thiserror::Error;

use crate::ideas::ValidationError;
use crate::llm::LlmError;

/// Why a generation produced no result
///
/// Every variant is reported to the user; none is retried. A response that
/// parses to zero ideas is not an error (see `GenerationOutcome::is_empty`).
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Bad input, rejected before any API call
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Missing or rejected credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connectivity problem or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with an error or an unusable body
    #[error("Provider error: {0}")]
    Provider(String),

    /// A prompt template could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl From<LlmError> for GenerateError {
    fn from(err: LlmError) -> Self {
        if err.is_auth() {
            GenerateError::Auth(err.to_string())
        } else if err.is_transport() {
            GenerateError::Network(err.to_string())
        } else {
            GenerateError::Provider(err.to_string())
        }
    }
}

impl GenerateError {
    /// Short category name for display and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::Network(_) => "network",
            Self::Provider(_) => "provider",
            Self::Prompt(_) => "prompt",
        }
    }
}
