use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// System routes mounted at `/system`.
///
/// ```text
/// GET /ip  -> get_ip
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ip", get(system::get_ip))
}
