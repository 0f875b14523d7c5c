//! Handlers for device information shown on the setup screen.

use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::net::non_loopback_ipv4;

/// Response payload for the IP lookup.
#[derive(Debug, Serialize)]
pub struct IpResponse {
    /// Non-loopback IPv4 addresses, or `null` when there are none.
    pub ips: Option<Vec<String>>,
}

/// GET /api/system/ip
pub async fn get_ip() -> AppResult<Json<IpResponse>> {
    let ips = tokio::task::spawn_blocking(non_loopback_ipv4)
        .await
        .map_err(|e| AppError::InternalError(format!("Interface lookup task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Failed to list network interfaces: {e}")))?;

    let ips: Vec<String> = ips.into_iter().map(|ip| ip.to_string()).collect();
    Ok(Json(IpResponse {
        ips: (!ips.is_empty()).then_some(ips),
    }))
}
