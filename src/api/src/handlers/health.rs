//! Service info endpoint

use crate::models::ServiceInfo;
use axum::Json;

/// Service info
///
/// Public by allow-list; reports service status and version.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = ServiceInfo),
    )
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
