use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use super::{ApiError, AppState};

/// # Endpoint
/// `GET /sitemap.xml`
pub async fn get_sitemap(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let xml = state.sitemap.generate(Utc::now()).await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}
