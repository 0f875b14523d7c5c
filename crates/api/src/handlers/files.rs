//! Handlers for the `/files` resource.
//!
//! Listing, serving, updating, reordering and deleting uploaded display
//! assets. New assets arrive through [`super::uploads::upload_file`].

use std::path::Path as FsPath;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use signage_core::error::CoreError;
use signage_core::file_record::{FileView, UpdateFileRecord};

use crate::error::{AppError, AppResult};
use crate::serve::file_response;
use crate::state::AppState;

/// Query parameters for the file listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilesQuery {
    /// When `true`, hidden files are left out (display surface).
    #[serde(default)]
    pub visible: bool,
}

/// GET /api/files
///
/// All files in display order, with their URLs.
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<ListFilesQuery>,
) -> Json<Vec<FileView>> {
    let files = if params.visible {
        state.files.list_visible().await
    } else {
        state.files.list().await
    };
    Json(files)
}

/// GET /api/files/{id}
/// GET /api/files/{id}/display
///
/// Stream the asset the display shows: the PNG preview for PDFs, otherwise
/// the uploaded original.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let record = state
        .files
        .get(&id)
        .await
        .ok_or_else(|| CoreError::not_found("File", &id))?;
    file_response(FsPath::new(record.display_path()), "File", &id).await
}

/// PATCH /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFileRecord>,
) -> AppResult<Json<FileView>> {
    let record = state.files.update(&id, &input).await?;
    Ok(Json(record.into()))
}

/// PUT /api/files/{id}/toggle-hidden
pub async fn toggle_hidden(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FileView>> {
    let record = state.files.toggle_hidden(&id).await?;
    tracing::info!(id = %record.id, hidden = record.hidden, "File visibility toggled");
    Ok(Json(record.into()))
}

/// DELETE /api/files/{id}
///
/// Removes the metadata record together with the original and its preview.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.files.delete(&id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "File deleted",
    })))
}

/// PUT /api/files/order
///
/// Body: `{ "fileIds": ["...", ...] }`. Files left out of the list keep
/// their relative order after the listed ones. Returns the new order.
pub async fn update_order(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Vec<FileView>>> {
    let ids: Vec<String> = body
        .get("fileIds")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::BadRequest("fileIds must be an array".into()))?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    let files = state.files.update_order(&ids).await?;
    Ok(Json(files))
}
