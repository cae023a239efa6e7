//! Structured fact extraction.
//!
//! Asks the model for a `{"facts": [{actor, action, object}, ...]}` JSON
//! object, keeps at most [`MAX_FACTS_PER_ARTICLE`] valid facts, and returns an
//! empty list on any failure.

use std::sync::Arc;

use serde::Deserialize;
use sigma_core::{call_with_rotation, CredentialPool, Fact, MAX_FACTS_PER_ARTICLE};

use crate::client::GroqClient;
use crate::error::LlmError;
use crate::types::{ChatMessage, ChatRequest, ResponseFormat};

/// Article text beyond this many characters is not sent to the model.
pub const MAX_INPUT_CHARS: usize = 3_000;

const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Deserialize)]
struct FactsPayload {
    #[serde(default)]
    facts: Vec<serde_json::Value>,
}

/// Model output is loosely typed: fields may be missing or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LooseFact {
    actor: Option<String>,
    action: Option<String>,
    object: Option<String>,
}

impl From<LooseFact> for Fact {
    fn from(raw: LooseFact) -> Self {
        Fact {
            actor: raw.actor.unwrap_or_default(),
            action: raw.action.unwrap_or_default(),
            object: raw.object.unwrap_or_default(),
        }
    }
}

pub struct FactExtractor {
    client: GroqClient,
    keys: Arc<CredentialPool>,
    model: String,
}

impl FactExtractor {
    #[must_use]
    pub fn new(client: GroqClient, keys: Arc<CredentialPool>, model: &str) -> Self {
        Self {
            client,
            keys,
            model: model.to_string(),
        }
    }

    /// Extracts up to two facts from `text`.
    ///
    /// When `topic` is set and is not `"all"`, the model is told to return no
    /// facts for unrelated text. Never fails: rate limits rotate the key pool,
    /// everything else yields an empty list.
    pub async fn extract_facts(&self, text: &str, topic: Option<&str>) -> Vec<Fact> {
        let topic = gated_topic(topic);
        let request = self.build_request(text, topic);
        let request = &request;

        let result = call_with_rotation(&self.keys, |api_key| async move {
            self.client.chat(&api_key, request).await
        })
        .await
        .map_err(LlmError::from);

        let content = match result {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "fact extraction failed");
                return Vec::new();
            }
        };

        match parse_facts(&content) {
            Ok(facts) => {
                if facts.is_empty() {
                    tracing::info!(topic = ?topic, "no relevant facts extracted");
                }
                facts
            }
            Err(e) => {
                tracing::warn!(error = %e, "fact extraction returned malformed JSON");
                Vec::new()
            }
        }
    }

    fn build_request(&self, text: &str, topic: Option<&str>) -> ChatRequest {
        let excerpt: String = text.chars().take(MAX_INPUT_CHARS).collect();

        let gate = topic
            .map(|topic| {
                format!(
                    "First verify that the text is about '{topic}'. \
                     If it is unrelated to '{topic}', return {{\"facts\": []}}. "
                )
            })
            .unwrap_or_default();
        let system = format!(
            "You are a precision news fact extraction engine. Output ONLY valid JSON. {gate}\
             Extract exactly 2 key facts from the provided text using this flat structure:\n\
             {{\"facts\": [{{\"actor\": \"...\", \"action\": \"...\", \"object\": \"...\"}}]}}"
        );

        let user = format!(
            "Extract 2 key facts from this article: '''{excerpt}'''\n\
             Output valid JSON with no extra fields and at most 2 facts. \
             If the text is irrelevant to the search intent, return an empty facts list."
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            response_format: Some(ResponseFormat::json_object()),
            temperature: Some(TEMPERATURE),
        }
    }
}

/// Topic used for relevance gating; `"all"` and blanks disable the gate.
fn gated_topic(topic: Option<&str>) -> Option<&str> {
    topic
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
}

/// Parses the model's JSON object, dropping invalid facts and anything past
/// the first two valid ones.
fn parse_facts(content: &str) -> Result<Vec<Fact>, serde_json::Error> {
    let payload: FactsPayload = serde_json::from_str(content)?;
    Ok(payload
        .facts
        .into_iter()
        .filter_map(|value| serde_json::from_value::<LooseFact>(value).ok())
        .map(Fact::from)
        .filter(Fact::is_valid)
        .take(MAX_FACTS_PER_ARTICLE)
        .collect())
}
