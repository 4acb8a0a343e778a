//! Streaming chat translation.
//!
//! A pump task reads the upstream body, reassembles frames and applies the
//! keep-alive policy; the client-facing stream lazily pulls decoded frames
//! over a bounded channel, so a slow client applies backpressure all the way
//! to the upstream socket. Token usage is handed back on a side channel once
//! the stream ends cleanly.

use bytes::Bytes;
use futures_util::Stream;
use tokio::sync::{mpsc, oneshot};

use crate::error::RelayError;
use crate::protocol::convert::stream_chunk_to_openai;
use crate::protocol::sensenova::{NovaStreamChunk, NovaUsage};
use crate::stream::framing::{strip_frame_marker, vendor_frame_stream};
use crate::stream::{sse_data_frame, DONE_FRAME};
use crate::util::strip_data_label;

/// Receiver half of the usage hand-back for one translated stream.
pub struct StreamUsage {
    rx: oneshot::Receiver<NovaUsage>,
}

impl StreamUsage {
    /// Await the usage observed on the stream. Resolves to `None` when the
    /// stream ended abnormally and nothing should be billed from it.
    pub async fn resolve(self) -> Option<NovaUsage> {
        self.rx.await.ok()
    }
}

/// Translate a streaming vendor chat response into client-facing SSE frames.
///
/// The returned stream yields one `data:` frame per decodable vendor frame,
/// in arrival order, closed by a single `data: [DONE]` frame. Undecodable
/// frames are logged and skipped. A vendor read failure ends the stream with
/// one error item and no `[DONE]`; dropping the stream stops the pump and
/// releases the upstream body.
///
/// Must be called inside a tokio runtime; the pump runs as a spawned task.
pub fn translate_chat_stream<S, E>(
    byte_stream: S,
) -> (
    impl Stream<Item = Result<Bytes, RelayError>> + Send,
    StreamUsage,
)
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let (frame_tx, frame_rx) = mpsc::channel::<Result<Bytes, RelayError>>(1);
    let (usage_tx, usage_rx) = oneshot::channel::<NovaUsage>();

    let pump = tokio::spawn(pump_frames(byte_stream, frame_tx));

    let output = futures_util::stream::unfold(
        (frame_rx, pump, NovaUsage::default(), Some(usage_tx), false),
        |(mut frames, mut pump, mut usage, mut usage_tx, mut done)| async move {
            loop {
                if done {
                    return None;
                }
                match frames.recv().await {
                    Some(Ok(payload)) => {
                        let chunk: NovaStreamChunk =
                            match serde_json::from_slice(strip_data_label(&payload)) {
                                Ok(chunk) => chunk,
                                Err(e) => {
                                    tracing::warn!(
                                        error = %e,
                                        "skipping undecodable stream frame"
                                    );
                                    continue;
                                }
                            };
                        if chunk.usage.total_tokens != 0 {
                            usage = chunk.usage;
                        }
                        let event = stream_chunk_to_openai(&chunk);
                        let item = match serde_json::to_string(&event) {
                            Ok(json) => Ok(Bytes::from(sse_data_frame(&json))),
                            Err(e) => {
                                done = true;
                                Err(RelayError::Encode(format!(
                                    "failed to serialize stream event: {e}"
                                )))
                            }
                        };
                        return Some((item, (frames, pump, usage, usage_tx, done)));
                    }
                    Some(Err(read_error)) => {
                        done = true;
                        return Some((Err(read_error), (frames, pump, usage, usage_tx, done)));
                    }
                    None => {
                        done = true;
                        // Channel closed: either the pump finished cleanly or
                        // it died. Only a clean finish gets usage and [DONE].
                        if let Err(e) = (&mut pump).await {
                            return Some((
                                Err(RelayError::UpstreamClose(format!(
                                    "frame pump ended abnormally: {e}"
                                ))),
                                (frames, pump, usage, usage_tx, done),
                            ));
                        }
                        if let Some(tx) = usage_tx.take() {
                            let _ = tx.send(usage);
                        }
                        return Some((
                            Ok(Bytes::from_static(DONE_FRAME.as_bytes())),
                            (frames, pump, usage, usage_tx, done),
                        ));
                    }
                }
            }
        },
    );

    (output, StreamUsage { rx: usage_rx })
}

/// Pump task: reassemble frames, drop keep-alives, forward payloads.
async fn pump_frames<S, E>(byte_stream: S, frames: mpsc::Sender<Result<Bytes, RelayError>>)
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    use futures_util::StreamExt;

    let mut source = Box::pin(vendor_frame_stream(byte_stream));
    while let Some(item) = source.next().await {
        match item {
            Ok(frame) => {
                let Some(payload) = strip_frame_marker(&frame) else {
                    continue;
                };
                if frames.send(Ok(payload)).await.is_err() {
                    // Receiver gone: the client hung up. Dropping the source
                    // releases the upstream body.
                    return;
                }
            }
            Err(error) => {
                let _ = frames.send(Err(error)).await;
                return;
            }
        }
    }
}
