//! Route definitions for multipart uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use signage_core::upload_policy::{MAX_ASSET_BYTES, MAX_IMAGE_BYTES};

use crate::handlers::uploads;
use crate::state::AppState;

/// Slack above the file limit for multipart framing and other fields, so
/// the intake reports an oversized file itself.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Request body limit for a multipart route whose file may be `file_limit` bytes.
pub fn multipart_limit(file_limit: u64) -> usize {
    usize::try_from(file_limit + MULTIPART_OVERHEAD).unwrap_or(usize::MAX)
}

/// Upload routes mounted at the `/api` root.
///
/// ```text
/// POST   /upload               -> upload_file
/// POST   /widget-image         -> upload_widget_image
/// GET    /widget-image/{id}    -> get_widget_image
/// DELETE /widget-image/{id}    -> delete_widget_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(uploads::upload_file)
                .layer(DefaultBodyLimit::max(multipart_limit(MAX_ASSET_BYTES))),
        )
        .route(
            "/widget-image",
            post(uploads::upload_widget_image)
                .layer(DefaultBodyLimit::max(multipart_limit(MAX_IMAGE_BYTES))),
        )
        .route(
            "/widget-image/{id}",
            get(uploads::get_widget_image).delete(uploads::delete_widget_image),
        )
}
