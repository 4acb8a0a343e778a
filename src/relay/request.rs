//! Outbound request preparation: endpoint choice, token signing, header
//! setup and body conversion, everything short of sending.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};

use crate::auth::{sign_token, KeyPair};
use crate::config::ChannelConfig;
use crate::error::RelayError;
use crate::protocol::convert::{chat_request_to_nova, embedding_request_to_nova};
use crate::protocol::openai::RelayRequest;
use crate::relay::RelayMode;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/llm/chat-completions";
pub const EMBEDDINGS_PATH: &str = "/v1/llm/embeddings";

/// A fully prepared upstream request; the gateway's HTTP client sends it
/// as-is.
#[derive(Debug)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Correlation id stamped into usage logs for this relay call.
    pub request_id: uuid::Uuid,
}

/// Models routed to the embeddings endpoint.
#[must_use]
pub fn is_embedding_model(model: &str) -> bool {
    model.starts_with("Embedding")
}

/// Pick the upstream endpoint for a model. The split keys on the model name
/// prefix, not the relay mode.
#[must_use]
pub fn request_url(base_url: &str, model: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if is_embedding_model(model) {
        format!("{base}{EMBEDDINGS_PATH}")
    } else {
        format!("{base}{CHAT_COMPLETIONS_PATH}")
    }
}

/// Build the outbound upstream request for one relay call.
///
/// Parses the channel key pair, mints a fresh signed token, converts the
/// body to the vendor shape and picks the endpoint. The token goes into the
/// `Authorization` header bare, without a `Bearer` prefix. Image generation
/// is refused before any of that happens.
///
/// # Errors
///
/// `RelayError::UnsupportedRequest` for image mode, `RelayError::Auth` for a
/// malformed channel key or a signing failure, `RelayError::Encode` when the
/// vendor body fails to serialize.
pub fn prepare_request(
    channel: &ChannelConfig,
    mode: RelayMode,
    request: &RelayRequest,
) -> Result<PreparedRequest, RelayError> {
    if mode == RelayMode::ImageGenerations {
        return Err(RelayError::UnsupportedRequest(
            "image generation is not relayed for this channel".to_string(),
        ));
    }

    let keys = KeyPair::parse(&channel.api_key)?;
    let token = sign_token(&keys)?;

    let body = match mode {
        RelayMode::Embeddings => encode_body(&embedding_request_to_nova(request))?,
        _ => encode_body(&chat_request_to_nova(request))?,
    };

    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let token_value = HeaderValue::from_str(&token)
        .map_err(|e| RelayError::Auth(format!("signed token is not a valid header value: {e}")))?;
    headers.insert(AUTHORIZATION, token_value);

    Ok(PreparedRequest {
        url: request_url(&channel.base_url, &request.model),
        headers,
        body,
        request_id: next_request_id(),
    })
}

fn encode_body<T: serde::Serialize>(body: &T) -> Result<Bytes, RelayError> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| RelayError::Encode(format!("failed to serialize upstream request: {e}")))
}

// ---------------------------------------------------------------------------
// Correlation ids
// ---------------------------------------------------------------------------

static REQUEST_IDS: LazyLock<RequestIdGenerator> = LazyLock::new(RequestIdGenerator::new);

/// Sequential correlation ids xored into a random per-process seed, so ids
/// are unique and non-guessable without any per-call locking.
struct RequestIdGenerator {
    seed: u128,
    counter: AtomicU64,
}

impl RequestIdGenerator {
    fn new() -> Self {
        let seed_hi = u128::from(fastrand::u64(..));
        let seed_lo = u128::from(fastrand::u64(..));
        Self {
            seed: (seed_hi << 64) | seed_lo,
            counter: AtomicU64::new(1),
        }
    }

    fn next(&self) -> uuid::Uuid {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        uuid::Uuid::from_u128(self.seed ^ u128::from(seq))
    }
}

fn next_request_id() -> uuid::Uuid {
    REQUEST_IDS.next()
}
