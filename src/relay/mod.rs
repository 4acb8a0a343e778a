//! The adaptor's relay surface: per-call request preparation and response
//! dispatch.

pub mod request;
pub mod response;

use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream::BoxStream;

use crate::error::RelayError;
use crate::stream::translate::{translate_chat_stream, StreamUsage};
use self::response::{relay_chat_response, relay_embeddings_response, JsonReply};

/// This adaptor's channel name in the gateway's routing tables.
pub const CHANNEL_NAME: &str = "sensetime";

/// Models relayable through this adaptor.
pub const SUPPORTED_MODELS: &[&str] = &[
    "SenseChat",
    "SenseChat-Turbo",
    "SenseChat-32K",
    "SenseChat-128K",
    "SenseChat-5",
    "nova-embedding-stable",
];

/// Relay call modes this adaptor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    ChatCompletions,
    Embeddings,
    ImageGenerations,
}

/// One relayed upstream response, ready for the gateway's HTTP writer.
pub enum RelayedResponse {
    /// A buffered JSON reply plus the usage to bill.
    Json(JsonReply),
    /// A live event stream, plus a handle resolving to the usage once the
    /// stream ends cleanly.
    Stream {
        events: BoxStream<'static, Result<Bytes, RelayError>>,
        usage: StreamUsage,
    },
    /// Image generation has no vendor endpoint here; the gateway's generic
    /// pass-through handler takes over.
    Delegated,
}

/// Route an upstream response body to the matching translator.
///
/// Embedding mode wins over the stream flag, so a stray `stream: true` on an
/// embedding call still gets the buffered translation.
///
/// # Errors
///
/// Buffered modes propagate read, decode and vendor errors from the
/// translation; the streaming mode reports its errors as stream items
/// instead.
pub async fn dispatch_response<S, E>(
    mode: RelayMode,
    stream: bool,
    status: http::StatusCode,
    body: S,
) -> Result<RelayedResponse, RelayError>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    use futures_util::StreamExt;

    match mode {
        RelayMode::Embeddings => Ok(RelayedResponse::Json(
            relay_embeddings_response(status, body).await?,
        )),
        RelayMode::ImageGenerations => Ok(RelayedResponse::Delegated),
        RelayMode::ChatCompletions if stream => {
            let (events, usage) = translate_chat_stream(body);
            Ok(RelayedResponse::Stream {
                events: events.boxed(),
                usage,
            })
        }
        RelayMode::ChatCompletions => Ok(RelayedResponse::Json(
            relay_chat_response(status, body).await?,
        )),
    }
}
