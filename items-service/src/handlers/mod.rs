//! HTTP handlers
//!
//! - [`root`]: plain-text welcome at `/`
//! - [`items`]: CRUD over the item store
//! - [`not_found`]: fallback for every unmatched path or method

pub mod body;
pub mod items;
pub mod path;

use axum::extract::OriginalUri;

use crate::error::Error;

pub use body::{is_truthy, ItemFields};
pub use items::{
    create_item, delete_item, get_item, list_items, update_item, CREATE_FIELDS_REQUIRED,
    UPDATE_FIELDS_REQUIRED,
};
pub use path::ItemId;

/// Body of `GET /`
pub const WELCOME_MESSAGE: &str = "Hello, World! Welcome to the Simple Items API.";

/// GET /
pub async fn root() -> &'static str {
    WELCOME_MESSAGE
}

/// Fallback for routes that do not exist
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Error {
    tracing::debug!(%uri, "No route matched");
    Error::route_not_found(&uri)
}
