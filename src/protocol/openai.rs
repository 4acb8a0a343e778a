//! Normalized (`OpenAI`-style) wire types for the relay side of the adaptor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized relay request as the gateway hands it to the adaptor. One
/// request type covers chat completions and embeddings; embeddings carry
/// `input` instead of `messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<EmbeddingInput>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// `OpenAI` message wire type. Content is either a plain string or an array
/// of typed parts; it is kept as raw JSON and flattened on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OpenAiMessage {
    /// Flatten message content to plain text. Array content keeps only its
    /// `text` parts, concatenated in order; anything else becomes empty.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.content {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(arr)) => {
                let mut text = String::new();
                for part in arr {
                    if part.get("type").and_then(|t| t.as_str()) != Some("text") {
                        continue;
                    }
                    if let Some(content) = part.get("text").and_then(|t| t.as_str()) {
                        text.push_str(content);
                    }
                }
                text
            }
            None | Some(_) => String::new(),
        }
    }
}

/// `input` field of an embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Multi(Vec<String>),
}

impl EmbeddingInput {
    /// The inputs as a uniform list.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        match self {
            EmbeddingInput::Single(text) => vec![text.clone()],
            EmbeddingInput::Multi(texts) => texts.clone(),
        }
    }
}

/// `OpenAI` Chat Completion response wire type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChatResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<OpenAiChoice>,
    pub usage: OpenAiUsage,
}

/// A single choice in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChoice {
    pub index: u32,
    pub message: OpenAiMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage on responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// `OpenAI` streaming chunk wire type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiStreamChunk {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<OpenAiStreamChoice>,
}

/// A single choice in a streaming chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiStreamChoice {
    pub index: u32,
    pub delta: OpenAiDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental message delta within a streaming chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// `OpenAI` embedding response wire type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiEmbeddingResponse {
    pub object: String,
    pub data: Vec<OpenAiEmbeddingItem>,
    pub model: String,
    pub usage: OpenAiUsage,
}

/// One embedding vector in the response list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiEmbeddingItem {
    pub object: String,
    pub index: u32,
    pub embedding: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_content_plain_string() {
        let msg = OpenAiMessage {
            role: "user".to_string(),
            content: Some(json!("hello")),
            name: None,
        };
        assert_eq!(msg.text_content(), "hello");
    }

    #[test]
    fn test_text_content_multipart_keeps_text_parts() {
        let msg = OpenAiMessage {
            role: "user".to_string(),
            content: Some(json!([
                {"type": "text", "text": "look at "},
                {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}},
                {"type": "text", "text": "this"},
            ])),
            name: None,
        };
        assert_eq!(msg.text_content(), "look at this");
    }

    #[test]
    fn test_text_content_missing_is_empty() {
        let msg = OpenAiMessage {
            role: "user".to_string(),
            content: None,
            name: None,
        };
        assert_eq!(msg.text_content(), "");
    }

    #[test]
    fn test_embedding_input_forms() {
        let single: EmbeddingInput = serde_json::from_value(json!("one")).unwrap();
        assert_eq!(single.texts(), vec!["one".to_string()]);

        let multi: EmbeddingInput = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(multi.texts(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_relay_request_defaults_and_extra() {
        let request: RelayRequest = serde_json::from_value(json!({
            "model": "SenseChat",
            "messages": [{"role": "user", "content": "hi"}],
            "frequency_penalty": 0.5,
        }))
        .unwrap();
        assert!(!request.stream);
        assert!(request.input.is_none());
        assert_eq!(request.extra["frequency_penalty"], json!(0.5));
    }

    #[test]
    fn test_stream_chunk_serializes_without_null_fields() {
        let chunk = OpenAiStreamChunk {
            id: "abc".to_string(),
            object: "chat.completion.chunk".to_string(),
            created: 1,
            model: "sensechat".to_string(),
            choices: vec![OpenAiStreamChoice {
                index: 0,
                delta: OpenAiDelta {
                    role: None,
                    content: Some("hi".to_string()),
                },
                finish_reason: None,
            }],
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(!json.contains("finish_reason"));
        assert!(!json.contains("role"));
    }
}
