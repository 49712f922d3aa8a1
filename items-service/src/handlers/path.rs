//! Path parameter extraction

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::Error;

/// The `{id}` segment of `/items/{id}`
///
/// Decoding failures (e.g. percent-encoded invalid UTF-8) reject with
/// [`Error::Internal`] instead of axum's plain-text 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemId(pub String);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn echo(ItemId(id): ItemId) -> String {
        id
    }

    fn app() -> Router {
        Router::new().route("/items/{id}", get(echo))
    }

    #[tokio::test]
    async fn test_extracts_decoded_id() {
        let request = http::Request::builder()
            .uri("/items/a%20b")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"a b");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_internal_error() {
        let request = http::Request::builder()
            .uri("/items/%FF")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Something went wrong on the server.");
        assert!(body["error"].as_str().unwrap().contains("Invalid UTF-8"));
    }
}
