//! Tracing setup and per-request usage reporting.

use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::protocol::openai::OpenAiUsage;

/// Initialize the tracing subscriber with the configured log level.
///
/// Maps config log levels to tracing levels:
/// - "DISABLED" -> no subscriber installed
/// - "WARNING" -> WARN
/// - "CRITICAL" -> ERROR
/// - Others map directly (DEBUG, INFO, ERROR)
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(log_level: &str) {
    let level = log_level.to_uppercase();

    if level == "DISABLED" {
        return;
    }

    let tracing_level = match level.as_str() {
        "WARNING" => "WARN",
        "CRITICAL" => "ERROR",
        other => other,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(tracing_level))
        .unwrap_or_else(|_| EnvFilter::new("INFO"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Log token usage for one completed relay call.
///
/// Emitted once per response, after the reply is written (non-streaming) or
/// the stream has ended cleanly; the gateway's billing collaborator reads the
/// same counts.
pub fn log_relay_usage(request_id: uuid::Uuid, model: &str, usage: &OpenAiUsage, elapsed: Duration) {
    info!(
        %request_id,
        model,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        duration_ms = elapsed.as_millis() as u64,
        "relay call complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_level_installs_nothing() {
        // Must not panic or install a global subscriber.
        init_tracing("DISABLED");
        init_tracing("disabled");
    }

    #[test]
    fn test_log_relay_usage_does_not_panic_without_subscriber() {
        log_relay_usage(
            uuid::Uuid::nil(),
            "SenseChat",
            &OpenAiUsage {
                prompt_tokens: 3,
                completion_tokens: 4,
                total_tokens: 7,
            },
            Duration::from_millis(12),
        );
    }
}
