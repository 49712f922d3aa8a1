//! Middleware for request tracking and panic recovery
//!
//! Provides request ID generation and propagation, sensitive header masking
//! for the trace logs, and the panic handler that turns a handler panic into
//! the standard 500 body.

use axum::{
    http::HeaderName,
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::{error::Error, ids::MakeTypedRequestId};

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Panic handler signature accepted by `CatchPanicLayer::custom`
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Create a request ID layer that generates TypeID request IDs in `header`
///
/// Requests that already carry the header keep their ID.
pub fn request_id_layer(header: HeaderName) -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::new(header, MakeTypedRequestId)
}

/// Copy the request ID from `header` onto the response
pub fn request_id_propagation_layer(header: HeaderName) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header)
}

/// Mark [`SENSITIVE_HEADERS`] as sensitive so trace output masks them
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}

/// Panic recovery rendering the standard 500 body
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Convert a panic payload into a 500 response carrying the panic message
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(panic = %details, "Handler panicked");
    Error::Internal(details).into_response()
}
