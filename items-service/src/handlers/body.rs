//! Request body extraction for item payloads
//!
//! Bodies are read as raw bytes and parsed leniently:
//!
//! - non-JSON `Content-Type` or an empty body: no fields supplied
//! - JSON object: `name` / `description` picked out as sent, of any JSON type
//! - JSON array: no fields supplied
//! - unparseable JSON or a scalar at the top level: [`Error::Internal`] (500)
//!
//! Whether a field satisfies validation is decided by [`is_truthy`].

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde_json::{Map, Value};

use crate::{
    error::Error,
    store::{ItemChanges, NewItem},
};

/// The `name` / `description` values a client sent
///
/// `None` means the key was missing from the body. A supplied `null`, `""`
/// or `0` is kept as `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFields {
    pub name: Option<Value>,
    pub description: Option<Value>,
}

impl ItemFields {
    fn from_object(mut object: Map<String, Value>) -> Self {
        Self {
            name: object.remove("name"),
            description: object.remove("description"),
        }
    }

    /// Fields for a create; `None` unless both are truthy
    pub fn into_new_item(self) -> Option<NewItem> {
        match (self.name, self.description) {
            (Some(name), Some(description)) if is_truthy(&name) && is_truthy(&description) => {
                Some(NewItem::new(name, description))
            }
            _ => None,
        }
    }

    /// Fields for an update; `None` unless at least one is truthy
    ///
    /// Every supplied key is carried over, falsy or not.
    pub fn into_changes(self) -> Option<ItemChanges> {
        let any_truthy = [&self.name, &self.description]
            .into_iter()
            .flatten()
            .any(is_truthy);
        if !any_truthy {
            return None;
        }
        Some(ItemChanges {
            name: self.name,
            description: self.description,
            ..ItemChanges::default()
        })
    }
}

/// JavaScript-style truthiness of a JSON value
///
/// `null`, `false`, `0` and `""` are falsy; everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<S> FromRequest<S> for ItemFields
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| Error::Internal(rejection.body_text()))?;

        if !is_json || bytes.is_empty() {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| Error::Internal(e.to_string()))?;

        match value {
            Value::Object(object) => Ok(Self::from_object(object)),
            Value::Array(_) => Ok(Self::default()),
            other => Err(Error::Internal(format!(
                "JSON body must be an object or array, got: {}",
                other
            ))),
        }
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<ItemFields, Error> {
        let mut builder = http::Request::builder().method("POST").uri("/items");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        ItemFields::from_request(request, &()).await
    }

    fn fields(name: Option<Value>, description: Option<Value>) -> ItemFields {
        ItemFields { name, description }
    }

    #[tokio::test]
    async fn test_object_with_both_fields() {
        let fields = extract(
            Some("application/json"),
            r#"{"name":"Monitor","description":"A display.","color":"black"}"#,
        )
        .await
        .unwrap();

        assert_eq!(fields.name, Some(json!("Monitor")));
        assert_eq!(fields.description, Some(json!("A display.")));
    }

    #[tokio::test]
    async fn test_values_of_any_type_are_kept() {
        let fields = extract(
            Some("application/json; charset=utf-8"),
            r#"{"name":"","description":42}"#,
        )
        .await
        .unwrap();

        assert_eq!(fields.name, Some(json!("")));
        assert_eq!(fields.description, Some(json!(42)));
    }

    #[tokio::test]
    async fn test_non_json_content_type_supplies_nothing() {
        let fields = extract(Some("text/plain"), r#"{"name":"X","description":"Y"}"#)
            .await
            .unwrap();
        assert_eq!(fields, ItemFields::default());

        let fields = extract(None, r#"{"name":"X","description":"Y"}"#)
            .await
            .unwrap();
        assert_eq!(fields, ItemFields::default());
    }

    #[tokio::test]
    async fn test_vendor_json_content_type() {
        let fields = extract(Some("application/vnd.items+json"), r#"{"name":"X"}"#)
            .await
            .unwrap();
        assert_eq!(fields.name, Some(json!("X")));
    }

    #[tokio::test]
    async fn test_empty_body_supplies_nothing() {
        let fields = extract(Some("application/json"), "").await.unwrap();
        assert_eq!(fields, ItemFields::default());
    }

    #[tokio::test]
    async fn test_array_body_supplies_nothing() {
        let fields = extract(Some("application/json"), r#"[{"name":"X"}]"#)
            .await
            .unwrap();
        assert_eq!(fields, ItemFields::default());
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let err = extract(Some("application/json"), r#"{"name":"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_scalar_json_is_internal_error() {
        let err = extract(Some("application/json"), r#""just a string""#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(7), json!(-1.5), json!("x"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_into_new_item_requires_both_truthy() {
        assert!(fields(Some(json!("X")), None).into_new_item().is_none());
        assert!(fields(Some(json!("X")), Some(json!(0)))
            .into_new_item()
            .is_none());

        let item = fields(Some(json!(5)), Some(json!("d"))).into_new_item();
        assert_eq!(item, Some(NewItem::new(5, "d")));
    }

    #[test]
    fn test_into_changes_requires_one_truthy() {
        assert!(ItemFields::default().into_changes().is_none());
        assert!(fields(Some(json!("")), Some(json!(null)))
            .into_changes()
            .is_none());

        let changes = fields(None, Some(json!("Y"))).into_changes().unwrap();
        assert_eq!(changes, ItemChanges::default().description("Y"));
    }

    #[test]
    fn test_into_changes_keeps_supplied_falsy_values() {
        let changes = fields(Some(json!("Z")), Some(json!("")))
            .into_changes()
            .unwrap();
        assert_eq!(changes, ItemChanges::default().name("Z").description(""));
    }
}
