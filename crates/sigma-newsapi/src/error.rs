use sigma_core::{RateLimitSignal, RotationError};
use thiserror::Error;

/// Errors returned by the NewsAPI client.
#[derive(Debug, Error)]
pub enum NewsApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NewsAPI refused the key for quota reasons (`rateLimited`,
    /// `apiKeyExhausted`, or a bare HTTP 429).
    #[error("NewsAPI rate limited: {code}")]
    RateLimited { code: String },

    /// NewsAPI returned `"status": "error"` for a non-quota reason.
    #[error("NewsAPI error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no NewsAPI keys configured")]
    NoCredentials,

    #[error("all {attempts} NewsAPI key attempts were rate limited")]
    KeysExhausted { attempts: usize },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl RateLimitSignal for NewsApiError {
    fn is_rate_limited(&self) -> bool {
        matches!(self, NewsApiError::RateLimited { .. })
    }
}

impl From<RotationError<NewsApiError>> for NewsApiError {
    fn from(err: RotationError<NewsApiError>) -> Self {
        match err {
            RotationError::NoCredentials { .. } => NewsApiError::NoCredentials,
            RotationError::Exhausted { attempts, .. } => NewsApiError::KeysExhausted { attempts },
            RotationError::Failed(inner) => inner,
        }
    }
}
