//! Route definitions for uploaded display assets.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// File routes mounted at `/files`.
///
/// ```text
/// GET    /                    -> list_files
/// PUT    /order               -> update_order
/// GET    /{id}                -> serve_file
/// PATCH  /{id}                -> update_file
/// DELETE /{id}                -> delete_file
/// GET    /{id}/display        -> serve_file
/// PUT    /{id}/toggle-hidden  -> toggle_hidden
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(files::list_files))
        .route("/order", put(files::update_order))
        .route(
            "/{id}",
            get(files::serve_file)
                .patch(files::update_file)
                .delete(files::delete_file),
        )
        .route("/{id}/display", get(files::serve_file))
        .route("/{id}/toggle-hidden", put(files::toggle_hidden))
}
