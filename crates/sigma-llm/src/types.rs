//! OpenAI-compatible chat-completions wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    #[must_use]
    pub fn json_object() -> Self {
        Self {
            kind: "json_object",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub(crate) fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_options() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            response_format: None,
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn json_object_format_serializes_as_type() {
        let json = serde_json::to_value(ResponseFormat::json_object()).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "json_object" }));
    }

    #[test]
    fn first_choice_content_is_returned() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" } },
                { "index": 1, "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_content().as_deref(), Some("first"));
    }

    #[test]
    fn blank_or_missing_content_is_none() {
        let blank: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": "  " } }]
        }))
        .unwrap();
        assert!(blank.into_content().is_none());

        let empty: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.into_content().is_none());
    }
}
