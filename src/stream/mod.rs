pub mod framing;
pub mod translate;

pub use framing::{vendor_frame_stream, strip_frame_marker, FrameScanner, FRAME_MARKER_LEN};
pub use translate::{translate_chat_stream, StreamUsage};

/// Terminal frame closing every successfully relayed stream.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Wrap a JSON payload as a client-facing SSE data frame.
#[must_use]
pub fn sse_data_frame(json: &str) -> String {
    let mut out = String::with_capacity(8 + json.len());
    out.push_str("data: ");
    out.push_str(json);
    out.push_str("\n\n");
    out
}
