//! Handlers for asset and widget-image uploads.
//!
//! An asset upload either ends with a metadata record whose files all exist
//! on disk, or fails and leaves nothing behind: a PDF whose preview cannot
//! be rendered is removed, and so are the stored files when the metadata
//! write fails.

use std::path::PathBuf;

use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};
use signage_core::file_record::{FileKind, FileView, NewFileRecord};
use signage_core::pdf::{converted_filename, PdfError};
use signage_core::upload_policy::{image_extension, stored_filename, UploadProfile};
use signage_store::AssetStore;

use crate::error::AppResult;
use crate::serve::file_response;
use crate::state::AppState;
use crate::upload::{discard, receive_upload, StoredUpload};

/// POST /api/upload
///
/// Multipart field `file` (image or PDF, up to 50 MB). PDFs get a PNG
/// preview of their first page.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let millis = chrono::Utc::now().timestamp_millis();
    let stored = receive_upload(
        &mut multipart,
        UploadProfile::Asset,
        |original, _| state.layout.uploads_dir.join(stored_filename(original, millis)),
    )
    .await?;

    let converted = match stored.kind {
        FileKind::Pdf => match convert_pdf(&state, &stored).await {
            Ok(path) => Some(path),
            Err(e) => {
                discard(&stored.path).await;
                return Err(e.into());
            }
        },
        FileKind::Image => None,
    };

    let new = NewFileRecord {
        filename: stored.file_name(),
        original_name: stored.original_name.clone(),
        kind: stored.kind,
        path: stored.path_string(),
        converted_path: converted
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        size: stored.size,
    };

    match state.files.add(new).await {
        Ok(record) => Ok(Json(json!({
            "success": true,
            "file": FileView::from(record),
        }))),
        Err(e) => {
            discard(&stored.path).await;
            if let Some(path) = &converted {
                discard(path).await;
            }
            Err(e.into())
        }
    }
}

/// Render the first page of an uploaded PDF into the converted directory.
async fn convert_pdf(state: &AppState, stored: &StoredUpload) -> Result<PathBuf, PdfError> {
    let output = state
        .layout
        .converted_dir
        .join(converted_filename(&stored.file_name()));
    let produced = match state
        .rasterizer
        .rasterize_first_page(&stored.path, &output)
        .await
    {
        Ok(path) => path,
        Err(e) => {
            discard(&output).await;
            return Err(e);
        }
    };

    if !tokio::fs::try_exists(&produced).await.unwrap_or(false) {
        return Err(PdfError::OutputMissing(produced.to_string_lossy().to_string()));
    }

    tracing::info!(
        pdf = %stored.path.display(),
        preview = %produced.display(),
        "PDF preview created"
    );
    Ok(produced)
}

/// POST /api/widget-image
///
/// Multipart field `image` (image, up to 5 MB). Returns the generated id
/// and the URL the clock screen loads it from.
pub async fn upload_widget_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let stored = receive_upload(
        &mut multipart,
        UploadProfile::WidgetImage,
        |original, mime| {
            state
                .layout
                .widgets_dir
                .join(AssetStore::new_widget_image_id(&image_extension(original, mime)))
        },
    )
    .await?;

    let id = stored.file_name();
    tracing::info!(%id, size = stored.size, "Widget image uploaded");
    Ok(Json(json!({
        "success": true,
        "id": id,
        "url": format!("/api/widget-image/{id}"),
    })))
}

/// GET /api/widget-image/{id}
pub async fn get_widget_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let path = state.assets.widget_image_path(&id)?;
    file_response(&path, "WidgetImage", &id).await
}

/// DELETE /api/widget-image/{id}
pub async fn delete_widget_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.assets.delete_widget_image(&id).await?;
    Ok(Json(json!({ "success": true })))
}
