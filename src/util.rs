//! Small shared helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix timestamp in seconds. Returns 0 if the system clock is
/// before the epoch.
#[inline]
#[must_use]
pub(crate) fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Strip one leading `data:` field label, plus at most one following space,
/// from a frame payload. Payloads without the label pass through untouched.
///
/// The vendor interleaves `id:` and `data:` lines inside one frame; after the
/// fixed-width marker strip the JSON body can still carry its field label.
#[inline]
pub(crate) fn strip_data_label(payload: &[u8]) -> &[u8] {
    let Some(rest) = payload.strip_prefix(b"data:") else {
        return payload;
    };
    rest.strip_prefix(b" ").unwrap_or(rest)
}
