//! In-memory item store
//!
//! [`ItemStore`] owns an insertion-ordered `Vec<Item>` and the ID generator.
//! Mutators take `&mut self`; the store does no locking of its own; sharing it
//! between requests is the job of [`AppState`](crate::state::AppState).
//!
//! Absence is reported with `Option`/`bool`, never an error: deciding what a
//! missing item means for the client belongs to the handlers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::ids::{Base36IdGenerator, IdGenerator};

/// Field names owned by [`Item`] itself; never stored as extra attributes
const RESERVED_FIELDS: [&str; 3] = ["id", "name", "description"];

/// A single item record
///
/// `name` and `description` hold whatever JSON value the client sent.
/// Extra attributes supplied at the store level are flattened next to the
/// named fields when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: Value,
    pub description: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    fn seed(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Value::from(name),
            description: Value::from(description),
            extra: Map::new(),
        }
    }
}

/// Fields for a new item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: Value,
    pub description: Value,
    /// Additional attributes kept as-is (keys `id`, `name`, `description` are ignored)
    pub extra: Map<String, Value>,
}

impl NewItem {
    pub fn new(name: impl Into<Value>, description: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Fields to merge over an existing item; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<Value>,
    pub description: Option<Value>,
    /// Additional attributes merged over existing ones (keys `id`, `name`, `description` are ignored)
    pub extra: Map<String, Value>,
}

impl ItemChanges {
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<Value>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Ordered in-memory collection of items
pub struct ItemStore {
    items: Vec<Item>,
    ids: Box<dyn IdGenerator>,
}

impl ItemStore {
    /// Empty store using random base-36 IDs
    pub fn new() -> Self {
        Self::with_id_generator(Base36IdGenerator::default())
    }

    /// Empty store using the given ID generator
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            items: Vec::new(),
            ids: Box::new(ids),
        }
    }

    /// Store pre-filled with the three sample items (IDs `1`, `2`, `3`)
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.items = vec![
            Item::seed("1", "Laptop", "A powerful computing device."),
            Item::seed("2", "Mouse", "A peripheral for computer navigation."),
            Item::seed("3", "Keyboard", "An input device for typing."),
        ];
        store
    }

    /// All items in insertion order
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    /// First item with the given ID
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a new item with a freshly generated ID and return it
    pub fn create(&mut self, new_item: NewItem) -> Item {
        let item = Item {
            id: self.ids.generate(),
            name: new_item.name,
            description: new_item.description,
            extra: without_reserved(new_item.extra),
        };
        self.items.push(item.clone());
        item
    }

    /// Shallow-merge `changes` over the item with the given ID
    ///
    /// The ID is never changed. Returns `None`, leaving the store untouched,
    /// when no item matches.
    pub fn update(&mut self, id: &str, changes: ItemChanges) -> Option<Item> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;

        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        item.extra.extend(without_reserved(changes.extra));

        Some(item.clone())
    }

    /// Remove the first item with the given ID; `true` if one was removed
    pub fn delete(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

fn without_reserved(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_FIELDS {
        extra.remove(key);
    }
    extra
}
