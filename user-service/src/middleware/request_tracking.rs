//! Request tracking middleware
//!
//! Every request gets an `x-request-id` (kept if the client sent one) that
//! is echoed on the response and recorded in the trace span. Credentials
//! in request headers are masked before they reach the logs.

use http::{header, HeaderName, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Prefix of generated request IDs
const REQUEST_ID_PREFIX: &str = "req_";

/// Headers masked in logs
pub const SENSITIVE_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::PROXY_AUTHORIZATION,
    HeaderName::from_static("x-api-key"),
];

/// Generates time-sortable request IDs, e.g. `req_0190b6f4c3d27c6e9a1b2c3d4e5f6a7b`
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("{}{}", REQUEST_ID_PREFIX, Uuid::now_v7().simple());
        let header_value = http::HeaderValue::from_str(&id).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Create a request ID layer
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::x_request_id(MakeUuidRequestId)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS)
}
