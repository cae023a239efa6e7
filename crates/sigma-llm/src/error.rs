use sigma_core::{RateLimitSignal, RotationError};
use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the provider.
    #[error("chat completion rate limited")]
    RateLimited,

    #[error("chat completion returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response carried no choices or an empty message.
    #[error("chat completion returned no content")]
    EmptyCompletion,

    #[error("no Groq keys configured")]
    NoCredentials,

    #[error("all {attempts} Groq key attempts were rate limited")]
    KeysExhausted { attempts: usize },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl RateLimitSignal for LlmError {
    fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited)
    }
}

impl From<RotationError<LlmError>> for LlmError {
    fn from(err: RotationError<LlmError>) -> Self {
        match err {
            RotationError::NoCredentials { .. } => LlmError::NoCredentials,
            RotationError::Exhausted { attempts, .. } => LlmError::KeysExhausted { attempts },
            RotationError::Failed(inner) => inner,
        }
    }
}
