pub mod config;
pub mod files;
pub mod health;
pub mod system;
pub mod uploads;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /files                          list (GET, ?visible=true)
/// /files/order                    reorder (PUT)
/// /files/{id}                     serve, update, delete (GET, PATCH, DELETE)
/// /files/{id}/display             serve display asset (GET)
/// /files/{id}/toggle-hidden       flip hidden flag (PUT)
///
/// /config                         get, update (GET, PUT)
/// /config/logo                    replace logo (POST, multipart)
/// /logo                           serve logo (GET)
///
/// /upload                         upload asset (POST, multipart)
/// /widget-image                   upload widget image (POST, multipart)
/// /widget-image/{id}              serve, delete (GET, DELETE)
///
/// /system/ip                      non-loopback IPv4 addresses (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/files", files::router())
        .nest("/config", config::router())
        .route("/logo", get(handlers::config::get_logo))
        .merge(uploads::router())
        .nest("/system", system::router())
}
