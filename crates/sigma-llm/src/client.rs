//! HTTP client for Groq's OpenAI-compatible chat-completions API.
//!
//! The client is credential-agnostic: callers pass the API key per request so
//! a shared pool can rotate keys between attempts.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";

/// Longest slice of an error body kept in [`LlmError::UnexpectedStatus`].
const ERROR_BODY_CHARS: usize = 200;

/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    base_url: Url,
}

impl GroqClient {
    /// Creates a new client pointed at the production Groq API.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new() -> Result<Self, LlmError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`LlmError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sigma/0.1 (news-engine)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| LlmError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Sends one chat completion and returns the first choice's content.
    ///
    /// # Errors
    ///
    /// - [`LlmError::RateLimited`] on HTTP 429.
    /// - [`LlmError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`LlmError::Http`] on network failure.
    /// - [`LlmError::Deserialize`] if the body is not a chat completion.
    /// - [`LlmError::EmptyCompletion`] if no content came back.
    pub async fn chat(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let url = self.completions_url();
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: format!("chat completion ({})", request.model),
                source: e,
            })?;

        parsed.into_content().ok_or(LlmError::EmptyCompletion)
    }

    fn completions_url(&self) -> Url {
        self.base_url
            .join("chat/completions")
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_keeps_base_path() {
        let client = GroqClient::with_base_url("https://api.groq.com/openai/v1").unwrap();
        assert_eq!(
            client.completions_url().as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn default_base_url_is_groq() {
        let client = GroqClient::new().unwrap();
        assert_eq!(
            client.completions_url().as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            GroqClient::with_base_url("::nope"),
            Err(LlmError::InvalidBaseUrl { .. })
        ));
    }
}
