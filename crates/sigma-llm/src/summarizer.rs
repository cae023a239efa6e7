//! Narrative summaries from a headline and its extracted facts.

use std::sync::Arc;

use sigma_core::{call_with_rotation, CredentialPool, Fact};

use crate::client::GroqClient;
use crate::error::LlmError;
use crate::types::{ChatMessage, ChatRequest};

/// Returned without calling the provider when a story has no facts.
pub const FACTS_UNAVAILABLE: &str = "Intelligence gathering in progress. Detailed facts are currently unavailable for this specific report.";

/// Returned when the provider call fails for any reason.
pub const SUMMARY_UNAVAILABLE: &str =
    "Summary generation encountered a temporary synchronization error.";

pub struct Summarizer {
    client: GroqClient,
    keys: Arc<CredentialPool>,
    model: String,
}

impl Summarizer {
    #[must_use]
    pub fn new(client: GroqClient, keys: Arc<CredentialPool>, model: &str) -> Self {
        Self {
            client,
            keys,
            model: model.to_string(),
        }
    }

    /// Writes a 70–80 word summary of `title` grounded in `facts`.
    ///
    /// The word count is requested, not enforced. Never fails: an empty fact
    /// list or a provider failure yields a fixed placeholder.
    pub async fn summarize(&self, title: &str, facts: &[Fact]) -> String {
        if facts.is_empty() {
            return FACTS_UNAVAILABLE.to_string();
        }

        let request = self.build_request(title, facts);
        let request = &request;

        let result = call_with_rotation(&self.keys, |api_key| async move {
            self.client.chat(&api_key, request).await
        })
        .await
        .map_err(LlmError::from);

        match result {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, title, "summary generation failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }

    fn build_request(&self, title: &str, facts: &[Fact]) -> ChatRequest {
        let fact_lines = facts
            .iter()
            .map(|f| format!("- {}", f.sentence()))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Headline: {title}\n\
             Facts:\n{fact_lines}\n\n\
             Task: Write a professional, comprehensive news summary.\n\
             Constraints:\n\
             1. Length: exactly 70 to 80 words.\n\
             2. Tone: journalistic and objective.\n\
             3. Flow logically; do not just list the facts.\n\
             4. Stay strictly on the headline's context."
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            response_format: None,
            temperature: None,
        }
    }
}
