//! Streaming stored files back to clients.

use std::path::Path;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use signage_core::error::CoreError;
use signage_core::upload_policy::content_type_for_extension;
use signage_store::StoreError;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};

/// Stream the file at `path`, or a 404 naming `entity`/`id` if it is gone.
///
/// Assets are replaced in place (the logo keeps its name), so responses
/// must be revalidated by the display.
pub async fn file_response(path: &Path, entity: &'static str, id: &str) -> AppResult<Response> {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(entity, id, path = %path.display(), "Stored file missing on disk");
            return Err(CoreError::not_found(entity, id).into());
        }
        Err(e) => return Err(StoreError::io(path, e).into()),
    };
    let file_size = file
        .metadata()
        .await
        .map_err(|e| StoreError::io(path, e))?
        .len();

    let content_type = content_type_for_extension(&path.to_string_lossy());
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
