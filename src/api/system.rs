//! System API endpoints.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiResponse, AppState, SystemStatus};

/// Returns the service version, uptime and whether the content backend
/// answers.
///
/// # Endpoint
/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<SystemStatus>> {
    let check = state.content().check_connection().await;

    Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        content_source: state.content_source,
        cms_reachable: check.is_ok(),
        cms_error: check.err().map(|failure| failure.to_string()),
    }))
}
