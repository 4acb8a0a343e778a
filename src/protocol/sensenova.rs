//! `SenseNova` vendor wire types.
//!
//! The upstream omits fields freely, so every response field decodes with a
//! default instead of failing the whole payload.

use serde::{Deserialize, Serialize};

/// Vendor chat-completion request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaChatRequest {
    pub model: String,
    pub messages: Vec<NovaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Vendor chat message: plain-text content only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaMessage {
    pub role: String,
    pub content: String,
}

/// Vendor non-streaming chat response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaChatResponse {
    #[serde(default)]
    pub data: NovaChatData,
    #[serde(default)]
    pub error: NovaError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaChatData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub choices: Vec<NovaChatChoice>,
    #[serde(default)]
    pub usage: NovaUsage,
}

/// A completed vendor choice. The reply text lives in `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaChatChoice {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: String,
}

/// Vendor error block; a non-empty `message` marks the whole response as an
/// error regardless of HTTP status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Vendor token usage. Streaming chunks report zeros until the final chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Vendor streaming chunk envelope. Usage and status ride at the top level,
/// next to the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaStreamChunk {
    #[serde(default)]
    pub data: NovaStreamData,
    #[serde(default)]
    pub usage: NovaUsage,
    #[serde(default)]
    pub status: NovaStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaStreamData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub choices: Vec<NovaStreamChoice>,
}

/// An incremental vendor choice. The text increment is the `delta` string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaStreamChoice {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub delta: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Vendor embedding request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaEmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
}

/// Vendor embedding response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaEmbeddingResponse {
    #[serde(default)]
    pub embeddings: Vec<NovaEmbeddingItem>,
    #[serde(default)]
    pub usage: NovaUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaEmbeddingItem {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub embedding: Vec<f64>,
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
}
