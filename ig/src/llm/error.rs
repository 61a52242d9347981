//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Longest provider message kept in an error
const MAX_MESSAGE_CHARS: usize = 500;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not found. Set the {env} environment variable or pass --api-key")]
    MissingApiKey { env: String },

    #[error("API rejected the credential ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown LLM provider: '{0}'. Supported: openai, anthropic")]
    UnknownProvider(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Build the error for a non-2xx HTTP status and its response body
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = provider_message(body);
        match status {
            401 | 403 => LlmError::Unauthorized { status, message },
            _ => LlmError::ApiError { status, message },
        }
    }

    /// Build the error for a failed send, separating timeouts from other transport failures
    pub fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(err)
        }
    }

    /// Check if this is a credential problem
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::MissingApiKey { .. } | LlmError::Unauthorized { .. })
    }

    /// Check if the request never got an answer from the provider
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Network(_) | LlmError::Timeout(_))
    }
}

/// Extract the human-readable message from a provider error body
///
/// OpenAI and Anthropic both answer `{"error": {"message": "..."}}`; anything
/// else is returned as (truncated) raw text.
pub fn provider_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() > MAX_MESSAGE_CHARS {
        let truncated: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{}...", truncated)
    } else {
        message
    }
}
