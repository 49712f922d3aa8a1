//! Route table
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`root`] |
//! | GET, POST | `/items` | [`list_items`], [`create_item`] |
//! | GET, PUT, DELETE | `/items/{id}` | [`get_item`], [`update_item`], [`delete_item`] |
//! | anything else | | [`not_found`] |
//!
//! Matching ignores a trailing slash and the case of the `items` segment, so
//! `/ITEMS/` reaches [`list_items`]. Path parameters keep their case.

use axum::{
    extract::{DefaultBodyLimit, OriginalUri, Request},
    http::Uri,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::normalize_path::NormalizePathLayer;

use crate::{
    handlers::{create_item, delete_item, get_item, list_items, not_found, root, update_item},
    middleware::catch_panic_layer,
    state::AppState,
};

/// Literal collection segment, matched case-insensitively
pub const ITEMS_SEGMENT: &str = "items";

/// Build the application router
///
/// Includes path normalization, the body size limit and panic recovery,
/// since all three decide which handler runs or what body comes back.
/// Transport concerns (tracing, request IDs, timeout, CORS) are added by
/// [`Server`](crate::server::Server).
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().middleware.body_limit_bytes();

    let routes = Router::new()
        .route("/", get(root))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(catch_panic_layer())
        .with_state(state);

    // Router::layer runs after route matching, so the rewrites wrap the
    // whole router instead.
    let normalized = ServiceBuilder::new()
        .map_request(fold_collection_case)
        .layer(NormalizePathLayer::trim_trailing_slash())
        .service(routes);

    Router::new().fallback_service(normalized)
}

/// Rewrite a case-variant `items` first segment to lowercase
///
/// The URI as sent is kept in [`OriginalUri`] for the 404 message.
fn fold_collection_case(mut request: Request) -> Request {
    if request.extensions().get::<OriginalUri>().is_none() {
        let original = OriginalUri(request.uri().clone());
        request.extensions_mut().insert(original);
    }
    if let Some(uri) = folded_uri(request.uri()) {
        *request.uri_mut() = uri;
    }
    request
}

fn folded_uri(uri: &Uri) -> Option<Uri> {
    let rest = uri.path().strip_prefix('/')?;
    let (first, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    if first == ITEMS_SEGMENT || !first.eq_ignore_ascii_case(ITEMS_SEGMENT) {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("/{}{}?{}", ITEMS_SEGMENT, tail, query),
        None => format!("/{}{}", ITEMS_SEGMENT, tail),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}
