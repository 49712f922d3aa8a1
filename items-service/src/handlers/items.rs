//! `/items` collection handlers
//!
//! Validation happens before the store is touched; a missing item is
//! detected from the store's `Option`/`bool` result.

use axum::{extract::State, Json};

use super::{body::ItemFields, path::ItemId};
use crate::{
    error::{Error, Result},
    responses::{Created, NoContent},
    state::AppState,
    store::Item,
};

/// Rejection text for a create missing either field
pub const CREATE_FIELDS_REQUIRED: &str =
    r#"Both "name" and "description" are required to create an item."#;

/// Rejection text for an update supplying neither field
pub const UPDATE_FIELDS_REQUIRED: &str =
    r#"At least "name" or "description" is required to update an item."#;

/// GET /items
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    let items = state.store().read().await.list().to_vec();
    tracing::debug!(count = items.len(), "Items listed");
    Json(items)
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<Item>> {
    let item = state.store().read().await.get(&id).cloned();
    match item {
        Some(item) => {
            tracing::debug!(id = %id, "Item fetched");
            Ok(Json(item))
        }
        None => Err(Error::item_not_found(&id)),
    }
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    fields: ItemFields,
) -> Result<Created<Item>> {
    let new_item = fields
        .into_new_item()
        .ok_or_else(|| Error::Validation(CREATE_FIELDS_REQUIRED.to_string()))?;

    let item = state.store().write().await.create(new_item);
    tracing::debug!(id = %item.id, "Item created");

    let location = format!("/items/{}", item.id);
    Ok(Created::new(item).with_location(location))
}

/// PUT /items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    fields: ItemFields,
) -> Result<Json<Item>> {
    let changes = fields
        .into_changes()
        .ok_or_else(|| Error::Validation(UPDATE_FIELDS_REQUIRED.to_string()))?;

    let updated = state.store().write().await.update(&id, changes);
    match updated {
        Some(item) => {
            tracing::debug!(id = %item.id, "Item updated");
            Ok(Json(item))
        }
        None => Err(Error::item_not_found(&id)),
    }
}

/// DELETE /items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<NoContent> {
    let deleted = state.store().write().await.delete(&id);
    if !deleted {
        return Err(Error::item_not_found(&id));
    }

    tracing::debug!(id = %id, "Item deleted");
    Ok(NoContent)
}
