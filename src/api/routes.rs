//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, get_link_handler, list_links_handler, shorten_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes open to anonymous callers. A bearer token, when sent, identifies the owner.
///
/// - `POST /shorten` - Create a short link
/// - `GET  /links`   - List the caller's links
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links", get(list_links_handler))
}

/// Routes requiring a resolvable bearer token, see [`crate::api::middleware::auth`].
///
/// - `GET    /links/{id}` - Fetch one owned link
/// - `PATCH  /links/{id}` - Change its destination
/// - `DELETE /links/{id}` - Soft-delete it
pub fn protected_routes() -> Router<AppState> {
    Router::new().route(
        "/links/{id}",
        get(get_link_handler)
            .patch(update_link_handler)
            .delete(delete_link_handler),
    )
}
