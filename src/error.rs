use serde_json::json;

/// Error type reported by the adaptor's `type` field when the vendor itself
/// rejected the call.
pub const VENDOR_ERROR_TYPE: &str = "sensenova_error";

/// Error type reported for failures produced inside the relay.
pub const RELAY_ERROR_TYPE: &str = "relay_error";

/// Relay error type used across all modules.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Unsupported request: {0}")]
    UnsupportedRequest(String),
    #[error("Upstream read error: {0}")]
    UpstreamRead(String),
    #[error("Upstream close error: {0}")]
    UpstreamClose(String),
    #[error("Upstream decode error: {0}")]
    Decode(String),
    #[error("Response encode error: {0}")]
    Encode(String),
    /// An error payload returned by the vendor itself. Carries the upstream
    /// HTTP status so it can be passed through unchanged.
    #[error("Vendor error: status={status}, code={code}, message={message}")]
    Vendor {
        status: u16,
        code: String,
        message: String,
    },
}

impl RelayError {
    /// Stable machine-readable code for the error payload. Vendor errors keep
    /// the code the vendor sent.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            RelayError::Auth(_) => "invalid_auth",
            RelayError::UnsupportedRequest(_) => "request_not_supported",
            RelayError::UpstreamRead(_) => "read_response_body_failed",
            RelayError::UpstreamClose(_) => "close_response_body_failed",
            RelayError::Decode(_) => "unmarshal_response_body_failed",
            RelayError::Encode(_) => "marshal_response_body_failed",
            RelayError::Vendor { code, .. } => code,
        }
    }

    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            RelayError::Vendor { .. } => VENDOR_ERROR_TYPE,
            _ => RELAY_ERROR_TYPE,
        }
    }

    /// HTTP status written to the client. Vendor errors pass the upstream
    /// status through unchanged; unrepresentable upstream statuses fall back
    /// to 500.
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        match self {
            RelayError::Auth(_) => http::StatusCode::UNAUTHORIZED,
            RelayError::UnsupportedRequest(_) => http::StatusCode::BAD_REQUEST,
            RelayError::UpstreamRead(_) | RelayError::Decode(_) => http::StatusCode::BAD_GATEWAY,
            RelayError::UpstreamClose(_) | RelayError::Encode(_) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Vendor { status, .. } => http::StatusCode::from_u16(*status)
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

// ---------------------------------------------------------------------------
// Client-facing payload
// ---------------------------------------------------------------------------

/// Format an error as (`status_code`, OpenAI-style JSON body).
///
/// Vendor errors surface the vendor's own message; relay errors surface the
/// full error display string.
#[must_use]
pub fn format_error(err: &RelayError) -> (http::StatusCode, serde_json::Value) {
    let message = match err {
        RelayError::Vendor { message, .. } => message.clone(),
        other => other.to_string(),
    };
    let body = json!({
        "error": {
            "message": message,
            "type": err.error_type(),
            "code": err.code(),
            "param": serde_json::Value::Null,
        }
    });
    (err.status(), body)
}

// ---------------------------------------------------------------------------
// Axum integration
// ---------------------------------------------------------------------------

/// Convert a `RelayError` into a ready-to-write axum response.
#[must_use]
pub fn into_axum_response(err: &RelayError) -> axum::response::Response {
    use axum::response::IntoResponse;
    let (status, body) = format_error(err);
    (status, axum::Json(body)).into_response()
}

impl axum::response::IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        into_axum_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_codes() {
        assert_eq!(RelayError::Auth("x".to_string()).code(), "invalid_auth");
        assert_eq!(
            RelayError::UnsupportedRequest("x".to_string()).code(),
            "request_not_supported"
        );
        assert_eq!(
            RelayError::UpstreamRead("x".to_string()).code(),
            "read_response_body_failed"
        );
        assert_eq!(
            RelayError::UpstreamClose("x".to_string()).code(),
            "close_response_body_failed"
        );
        assert_eq!(
            RelayError::Decode("x".to_string()).code(),
            "unmarshal_response_body_failed"
        );
        assert_eq!(
            RelayError::Encode("x".to_string()).code(),
            "marshal_response_body_failed"
        );
    }

    #[test]
    fn test_relay_error_statuses() {
        assert_eq!(
            RelayError::Auth("x".to_string()).status(),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RelayError::UnsupportedRequest("x".to_string()).status(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UpstreamRead("x".to_string()).status(),
            http::StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::Encode("x".to_string()).status(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_vendor_error_passes_status_and_code_through() {
        let err = RelayError::Vendor {
            status: 429,
            code: "rate_limited".to_string(),
            message: "slow down".to_string(),
        };
        assert_eq!(err.status(), http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.code(), "rate_limited");
        assert_eq!(err.error_type(), VENDOR_ERROR_TYPE);
    }

    #[test]
    fn test_vendor_error_invalid_status_falls_back_to_500() {
        let err = RelayError::Vendor {
            status: 7,
            code: "weird".to_string(),
            message: "x".to_string(),
        };
        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_format_error_payload_shape() {
        let err = RelayError::Auth("missing separator".to_string());
        let (status, body) = format_error(&err);
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "invalid_auth");
        assert_eq!(body["error"]["type"], RELAY_ERROR_TYPE);
        assert_eq!(body["error"]["param"], serde_json::Value::Null);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("missing separator"));
    }

    #[test]
    fn test_format_vendor_error_uses_vendor_message_verbatim() {
        let err = RelayError::Vendor {
            status: 401,
            code: "invalid_api_key".to_string(),
            message: "bad key".to_string(),
        };
        let (status, body) = format_error(&err);
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "bad key");
        assert_eq!(body["error"]["type"], VENDOR_ERROR_TYPE);
        assert_eq!(body["error"]["code"], "invalid_api_key");
    }
}
