//! Route definitions for the display configuration.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use signage_core::upload_policy::MAX_IMAGE_BYTES;

use crate::handlers::config;
use crate::state::AppState;

use super::uploads::multipart_limit;

/// Configuration routes mounted at `/config`.
///
/// ```text
/// GET  /      -> get_config
/// PUT  /      -> update_config
/// POST /logo  -> upload_logo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(config::get_config).put(config::update_config))
        .route(
            "/logo",
            post(config::upload_logo)
                .layer(DefaultBodyLimit::max(multipart_limit(MAX_IMAGE_BYTES))),
        )
}
