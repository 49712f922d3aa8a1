//! # items-service
//!
//! In-memory items CRUD service over HTTP/JSON.
//!
//! ## Features
//!
//! - **Items API**: list, fetch, create, update and delete items under `/items`
//! - **In-memory store**: injectable [`ItemStore`](store::ItemStore) with pluggable ID generation
//! - **Uniform errors**: every failure renders as `{"message": ...}` JSON
//! - **Middleware stack**: request tracking, panic recovery, body size limits, timeouts, CORS
//! - **Configuration**: layered TOML files and environment variables via figment
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use items_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Build application state
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .store(ItemStore::seeded())
//!         .build();
//!
//!     // Run server
//!     Server::new(config).serve(router(state)).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, MiddlewareConfig, ServiceConfig, StoreConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::handlers::{
        create_item, delete_item, get_item, is_truthy, list_items, not_found, root, update_item,
        ItemFields, ItemId,
    };
    pub use crate::ids::{Base36IdGenerator, IdGenerator, MakeTypedRequestId};
    pub use crate::middleware::{
        catch_panic_layer, request_id_layer, request_id_propagation_layer,
        sensitive_headers_layer, SENSITIVE_HEADERS,
    };
    pub use crate::observability::init_tracing;
    pub use crate::responses::{Created, NoContent};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::store::{Item, ItemChanges, ItemStore, NewItem};

    // Re-export commonly used external types
    pub use axum::{
        extract::{Path, State},
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, warn};
}
