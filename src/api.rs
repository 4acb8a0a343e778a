//! Assembly of client-facing HTTP responses from relayed results.

use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use futures_util::Stream;

use crate::error::RelayError;
use crate::relay::response::JsonReply;

/// Wrap a body in a streaming event response with the standard event-stream
/// headers.
#[must_use]
pub fn event_stream_response(body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = http::StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(
        http::header::CACHE_CONTROL,
        http::HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        http::header::CONNECTION,
        http::HeaderValue::from_static("keep-alive"),
    );
    response
}

/// Wrap translated stream events as a client-facing event-stream response.
///
/// Error items end the body; axum drops the connection mid-stream, which is
/// the only way left to signal failure once the 200 header is out.
#[must_use]
pub fn stream_events_response<S>(events: S) -> Response
where
    S: Stream<Item = Result<Bytes, RelayError>> + Send + 'static,
{
    event_stream_response(Body::from_stream(events))
}

/// Write a buffered JSON reply with the upstream status passed through.
#[must_use]
pub fn json_reply_response(reply: &JsonReply) -> Response {
    let mut response = Response::new(Body::from(reply.body.clone()));
    *response.status_mut() = reply.status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::openai::OpenAiUsage;

    #[tokio::test]
    async fn test_event_stream_response_headers() {
        let events = futures_util::stream::iter(vec![Ok::<Bytes, RelayError>(
            Bytes::from_static(b"data: {}\n\n"),
        )]);
        let response = stream_events_response(events);
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert_eq!(
            response.headers().get(http::header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );
        assert_eq!(
            response.headers().get(http::header::CONNECTION).unwrap(),
            "keep-alive"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"data: {}\n\n");
    }

    #[tokio::test]
    async fn test_json_reply_response_keeps_upstream_status() {
        let reply = JsonReply {
            status: http::StatusCode::ACCEPTED,
            body: Bytes::from_static(b"{\"ok\":true}"),
            usage: OpenAiUsage::default(),
        };
        let response = json_reply_response(&reply);
        assert_eq!(response.status(), http::StatusCode::ACCEPTED);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"{\"ok\":true}");
    }
}
