//! Reassembly of the vendor's event framing.
//!
//! The upstream does not speak regular SSE: frames are separated by a bare
//! `\n\n`, a frame may span several `field:value` lines, and keep-alives show
//! up as stray short lines. Frames arrive on an arbitrarily chunked byte
//! stream, so boundaries can land anywhere, including inside the terminator.

use std::sync::LazyLock;

use bytes::{Buf, Bytes, BytesMut};
use futures_util::Stream;
use memchr::{memchr, memmem};

use crate::error::RelayError;

/// Width of the fixed field marker preceding each frame's JSON payload.
/// Frames shorter than this are keep-alives or noise and carry no payload.
pub const FRAME_MARKER_LEN: usize = 5;

static LF_LF_FINDER: LazyLock<memmem::Finder<'static>> =
    LazyLock::new(|| memmem::Finder::new(b"\n\n"));

/// Incremental scanner that cuts complete frames out of buffered upstream
/// bytes.
///
/// A frame ends at the first `\n\n` preceded by at least one `:`; a
/// terminator with no field separator in front of it is not a frame boundary
/// and stays buffered. The terminator itself is consumed and never part of
/// the emitted frame.
#[derive(Debug, Default)]
pub struct FrameScanner {
    buffer: BytesMut,
}

impl FrameScanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Append raw bytes read from the upstream body.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Cut the next complete frame, or `None` until more input arrives.
    pub fn next_frame(&mut self) -> Option<Bytes> {
        let boundary = find_frame_boundary(&self.buffer)?;
        let frame = self.buffer.split_to(boundary).freeze();
        self.buffer.advance(2);
        Some(frame)
    }

    /// Flush whatever is still buffered as one final frame at end of input.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.buffer.split().freeze())
    }

    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Position of the first `\n\n` that has a `:` somewhere before it.
fn find_frame_boundary(buffer: &[u8]) -> Option<usize> {
    let colon = memchr(b':', buffer)?;
    LF_LF_FINDER.find_iter(buffer).find(|&pos| pos > colon)
}

/// Apply the keep-alive policy to a reassembled frame: frames shorter than
/// [`FRAME_MARKER_LEN`] are discarded, surviving frames lose their marker
/// prefix.
#[must_use]
pub fn strip_frame_marker(frame: &Bytes) -> Option<Bytes> {
    if frame.len() < FRAME_MARKER_LEN {
        return None;
    }
    Some(frame.slice(FRAME_MARKER_LEN..))
}

/// Lazily reassemble an upstream byte stream into whole frames.
///
/// Each item is a complete frame without its terminator. A read failure
/// surfaces as one `UpstreamRead` error item and ends the sequence; at a
/// clean end of input the buffered remainder, if any, is flushed as a final
/// partial frame.
pub fn vendor_frame_stream<S, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<Bytes, RelayError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    use futures_util::StreamExt;

    futures_util::stream::unfold(
        (Box::pin(byte_stream), FrameScanner::new(), false),
        |(mut stream, mut scanner, mut done)| async move {
            loop {
                if done {
                    return None;
                }
                if let Some(frame) = scanner.next_frame() {
                    return Some((Ok(frame), (stream, scanner, done)));
                }
                match stream.next().await {
                    Some(Ok(bytes)) => scanner.push(&bytes),
                    Some(Err(e)) => {
                        done = true;
                        return Some((
                            Err(RelayError::UpstreamRead(format!(
                                "failed to read upstream body: {e}"
                            ))),
                            (stream, scanner, done),
                        ));
                    }
                    None => {
                        done = true;
                        return scanner
                            .finish()
                            .map(|frame| (Ok(frame), (stream, scanner, done)));
                    }
                }
            }
        },
    )
}
