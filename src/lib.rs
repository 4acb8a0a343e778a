//! SenseNova (SenseTime) adaptor for an OpenAI-compatible relay gateway.
//!
//! The crate translates the gateway's normalized chat-completion protocol to
//! and from the SenseNova upstream API: it signs per-request vendor tokens,
//! converts request bodies, reassembles the vendor's non-standard event
//! framing and translates responses back, streaming or buffered. The gateway
//! owns the HTTP client and listener; this crate prepares outbound requests
//! and consumes response byte streams.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod relay;
pub mod stream;

mod util;
