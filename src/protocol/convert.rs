//! Conversions between the normalized relay protocol and the `SenseNova`
//! vendor protocol.

use crate::protocol::openai::{
    EmbeddingInput, OpenAiChatResponse, OpenAiChoice, OpenAiDelta, OpenAiEmbeddingItem,
    OpenAiEmbeddingResponse, OpenAiMessage, OpenAiStreamChoice, OpenAiStreamChunk, OpenAiUsage,
    RelayRequest,
};
use crate::protocol::sensenova::{
    NovaChatRequest, NovaChatResponse, NovaEmbeddingRequest, NovaEmbeddingResponse, NovaMessage,
    NovaStreamChunk, NovaUsage,
};
use crate::util::unix_now_secs;

/// Model identifier stamped on normalized chat responses and chunks.
pub const CHAT_RESPONSE_MODEL: &str = "sensechat";

/// The single vendor embedding model; embedding requests are pinned to it.
pub const EMBEDDING_MODEL: &str = "nova-embedding-stable";

/// Finish marker shared by the vendor and the normalized protocol.
pub const STOP_FINISH_REASON: &str = "stop";

/// Convert a normalized chat request into the vendor chat body. Message
/// content is flattened to plain text; `max_tokens` becomes
/// `max_new_tokens`.
#[must_use]
pub fn chat_request_to_nova(request: &RelayRequest) -> NovaChatRequest {
    let messages = request
        .messages
        .iter()
        .map(|message| NovaMessage {
            role: message.role.clone(),
            content: message.text_content(),
        })
        .collect();
    NovaChatRequest {
        model: request.model.clone(),
        messages,
        temperature: request.temperature,
        top_p: request.top_p,
        stream: request.stream,
        max_new_tokens: request.max_tokens,
    }
}

/// Convert a normalized embedding request into the vendor body. The model is
/// always the fixed vendor embedding model, whatever the caller asked for.
#[must_use]
pub fn embedding_request_to_nova(request: &RelayRequest) -> NovaEmbeddingRequest {
    NovaEmbeddingRequest {
        model: EMBEDDING_MODEL.to_string(),
        input: request
            .input
            .as_ref()
            .map(EmbeddingInput::texts)
            .unwrap_or_default(),
    }
}

/// Convert a vendor chat response into the normalized shape: a single choice
/// at index 0, role `assistant`, finish reason `stop`, usage passed through
/// verbatim. A response without choices yields empty content.
#[must_use]
pub fn chat_response_to_openai(response: &NovaChatResponse) -> OpenAiChatResponse {
    let content = response
        .data
        .choices
        .first()
        .map(|choice| choice.message.clone())
        .unwrap_or_default();
    OpenAiChatResponse {
        id: response.data.id.clone(),
        object: "chat.completion".to_string(),
        created: unix_now_secs(),
        model: CHAT_RESPONSE_MODEL.to_string(),
        choices: vec![OpenAiChoice {
            index: 0,
            message: OpenAiMessage {
                role: "assistant".to_string(),
                content: Some(serde_json::Value::String(content)),
                name: None,
            },
            finish_reason: Some(STOP_FINISH_REASON.to_string()),
        }],
        usage: usage_to_openai(response.data.usage),
    }
}

/// Convert a vendor streaming chunk into a normalized chunk. The vendor's
/// chunk id is reused; `created` is stamped at translation time. Only an
/// explicit vendor `stop` marker maps to a finish reason.
#[must_use]
pub fn stream_chunk_to_openai(chunk: &NovaStreamChunk) -> OpenAiStreamChunk {
    let (delta, finish_reason) = match chunk.data.choices.first() {
        Some(choice) => (
            choice.delta.clone(),
            (choice.finish_reason == STOP_FINISH_REASON)
                .then(|| STOP_FINISH_REASON.to_string()),
        ),
        None => (String::new(), None),
    };
    OpenAiStreamChunk {
        id: chunk.data.id.clone(),
        object: "chat.completion.chunk".to_string(),
        created: unix_now_secs(),
        model: CHAT_RESPONSE_MODEL.to_string(),
        choices: vec![OpenAiStreamChoice {
            index: 0,
            delta: OpenAiDelta {
                role: None,
                content: Some(delta),
            },
            finish_reason,
        }],
    }
}

/// Convert a vendor embedding response into the normalized list shape.
/// The vendor reports prompt and total tokens; completion tokens are derived
/// as their difference, floored at zero.
#[must_use]
pub fn embedding_response_to_openai(response: &NovaEmbeddingResponse) -> OpenAiEmbeddingResponse {
    let data = response
        .embeddings
        .iter()
        .map(|item| OpenAiEmbeddingItem {
            object: "embedding".to_string(),
            index: item.index,
            embedding: item.embedding.clone(),
        })
        .collect();
    OpenAiEmbeddingResponse {
        object: "list".to_string(),
        data,
        model: EMBEDDING_MODEL.to_string(),
        usage: OpenAiUsage {
            prompt_tokens: response.usage.prompt_tokens,
            completion_tokens: response
                .usage
                .total_tokens
                .saturating_sub(response.usage.prompt_tokens),
            total_tokens: response.usage.total_tokens,
        },
    }
}

/// Carry vendor usage over to the normalized shape field by field.
#[must_use]
pub fn usage_to_openai(usage: NovaUsage) -> OpenAiUsage {
    OpenAiUsage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    }
}
