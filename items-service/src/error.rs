//! Error types and HTTP response conversion

use axum::{
    extract::rejection::PathRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message returned with every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong on the server.";

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// `Validation`, `NotFound` and `Internal` carry the exact text clients see.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error (binding the listener, serving)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required request fields are missing (400)
    #[error("{0}")]
    Validation(String),

    /// No item with the given ID, or no matching route (404)
    #[error("{0}")]
    NotFound(String),

    /// Any other fault while handling a request (500)
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// 404 for an item ID that is not in the store
    pub fn item_not_found(id: impl fmt::Display) -> Self {
        Error::NotFound(format!("Item with ID {} not found.", id))
    }

    /// 404 for a request that matched no route
    ///
    /// The message echoes the path and query string as the client sent them.
    pub fn route_not_found(uri: &Uri) -> Self {
        let original = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        Error::NotFound(format!("Resource not found: {}", original))
    }

    /// HTTP status this error renders with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable message
    pub message: String,

    /// Underlying error text, only present on 500 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Create an error response with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Create the generic 500 body wrapping the underlying error text
    pub fn internal(error: impl Into<String>) -> Self {
        Self {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            error: Some(error.into()),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Error::Validation(msg) | Error::NotFound(msg) => ErrorResponse::new(msg),
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::internal(msg)
            }
            other => {
                tracing::error!("Unexpected error: {}", other);
                ErrorResponse::internal(other.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Internal(rejection.body_text())
    }
}
