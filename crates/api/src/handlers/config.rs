//! Handlers for the display configuration and the logo.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use serde_json::{json, Map, Value};
use signage_core::display_config::require_object;
use signage_core::error::CoreError;
use signage_core::upload_policy::{image_extension, UploadProfile};

use crate::error::AppResult;
use crate::serve::file_response;
use crate::state::AppState;
use crate::upload::receive_upload;

/// GET /api/config
///
/// The stored configuration merged onto the defaults.
pub async fn get_config(State(state): State<AppState>) -> Json<Map<String, Value>> {
    Json(state.display_config.get().await)
}

/// PUT /api/config
///
/// Shallow-merges the body (which must be a JSON object) over the current
/// configuration and returns the result.
pub async fn update_config(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Map<String, Value>>> {
    let partial = require_object(body)?;
    let merged = state.display_config.set(partial).await?;
    Ok(Json(merged))
}

/// POST /api/config/logo
///
/// Multipart field `logo`. Replaces the current logo, whatever its
/// extension was. The upload is staged first, so a rejected replacement
/// leaves the current logo untouched.
pub async fn upload_logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let stored = receive_upload(&mut multipart, UploadProfile::Logo, |_, _| {
        state.assets.logo_staging_path()
    })
    .await?;

    let ext = image_extension(&stored.original_name, &stored.content_type);
    let path = state.assets.install_logo(&stored.path, &ext).await?;

    tracing::debug!(path = %path.display(), size = stored.size, "Logo upload stored");
    Ok(Json(json!({ "success": true })))
}

/// GET /api/logo
pub async fn get_logo(State(state): State<AppState>) -> AppResult<Response> {
    let path = state
        .assets
        .find_logo()
        .await?
        .ok_or_else(|| CoreError::not_found("Logo", "logo"))?;
    file_response(&path, "Logo", "logo").await
}
