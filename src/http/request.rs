//! Request identification.
//!
//! # Responsibilities
//! - Assign a UUID request ID to requests that arrive without one
//! - Echo the request ID back on the response
//! - Expose the ID to handlers and log events
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied `x-request-id` is kept, not replaced

use axum::http::{HeaderName, Request};
use tower::Layer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestId, SetRequestId};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that sets and propagates `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = SetRequestId<PropagateRequestId<S>, MakeRequestUuid>;

    fn layer(&self, inner: S) -> Self::Service {
        let header = HeaderName::from_static(X_REQUEST_ID);
        SetRequestId::new(
            PropagateRequestId::new(inner, header.clone()),
            header,
            MakeRequestUuid,
        )
    }
}

/// Access to the request ID of a request.
pub trait RequestIdExt {
    /// The request ID, or `"unknown"` outside of `RequestIdLayer`.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_id_from_header() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::default())
            .unwrap();
        assert_eq!(req.request_id(), "abc-123");

        let req = Request::builder().body(Body::default()).unwrap();
        assert_eq!(req.request_id(), "unknown");
    }
}
