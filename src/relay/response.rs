//! Buffered (non-streaming) response translation.

use bytes::{Bytes, BytesMut};
use futures_util::Stream;

use crate::error::RelayError;
use crate::protocol::convert::{
    chat_response_to_openai, embedding_response_to_openai, usage_to_openai,
};
use crate::protocol::openai::OpenAiUsage;
use crate::protocol::sensenova::{NovaChatResponse, NovaEmbeddingResponse};

/// A translated JSON reply: the body, the upstream status to write it with,
/// and the usage to bill.
#[derive(Debug)]
pub struct JsonReply {
    pub status: http::StatusCode,
    pub body: Bytes,
    pub usage: OpenAiUsage,
}

/// Translate a buffered vendor chat response.
///
/// A populated vendor error block short-circuits into a vendor error that
/// keeps the upstream HTTP status; otherwise the reply is the normalized
/// single-choice response with the vendor usage passed through verbatim.
///
/// # Errors
///
/// `UpstreamRead` when the body cannot be read, `Decode` when it is not a
/// vendor chat payload, `Vendor` for an in-body vendor error, `Encode` when
/// the normalized reply fails to serialize.
pub async fn relay_chat_response<S, E>(
    status: http::StatusCode,
    body: S,
) -> Result<JsonReply, RelayError>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::fmt::Display,
{
    let raw = collect_body(body).await?;
    let response: NovaChatResponse = serde_json::from_slice(&raw)
        .map_err(|e| RelayError::Decode(format!("failed to decode upstream chat response: {e}")))?;

    if !response.error.message.is_empty() {
        return Err(RelayError::Vendor {
            status: status.as_u16(),
            code: response.error.code,
            message: response.error.message,
        });
    }

    let usage = usage_to_openai(response.data.usage);
    let reply = chat_response_to_openai(&response);
    let body = encode_reply(&reply)?;
    Ok(JsonReply {
        status,
        body,
        usage,
    })
}

/// Translate a buffered vendor embedding response. The billed usage is the
/// computed normalized usage, with completion tokens derived from the
/// total/prompt difference.
///
/// # Errors
///
/// `UpstreamRead`, `Decode` and `Encode` as for chat; the embedding payload
/// has no vendor error block.
pub async fn relay_embeddings_response<S, E>(
    status: http::StatusCode,
    body: S,
) -> Result<JsonReply, RelayError>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::fmt::Display,
{
    let raw = collect_body(body).await?;
    let response: NovaEmbeddingResponse = serde_json::from_slice(&raw).map_err(|e| {
        RelayError::Decode(format!("failed to decode upstream embedding response: {e}"))
    })?;

    let reply = embedding_response_to_openai(&response);
    let usage = reply.usage;
    let body = encode_reply(&reply)?;
    Ok(JsonReply {
        status,
        body,
        usage,
    })
}

async fn collect_body<S, E>(body: S) -> Result<Bytes, RelayError>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::fmt::Display,
{
    use futures_util::StreamExt;

    let mut body = Box::pin(body);
    let mut collected = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk
            .map_err(|e| RelayError::UpstreamRead(format!("failed to read upstream body: {e}")))?;
        collected.extend_from_slice(&chunk);
    }
    Ok(collected.freeze())
}

fn encode_reply<T: serde::Serialize>(reply: &T) -> Result<Bytes, RelayError> {
    serde_json::to_vec(reply)
        .map(Bytes::from)
        .map_err(|e| RelayError::Encode(format!("failed to serialize relay response: {e}")))
}
