use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_language;
use super::{ApiError, ApiResponse, AppState};

/// UI strings of one page section.
///
/// # Endpoint
/// `GET /api/{lang}/translations/{section}`
pub async fn get_translations(
    State(state): State<Arc<AppState>>,
    Path((lang, section)): Path<(String, String)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;

    let strings = state
        .content()
        .page_translations(&section, &lang)
        .await
        .into_option()
        .ok_or_else(|| ApiError::not_found("Translations for section", &section))?;

    Ok(Json(ApiResponse::success(strings)))
}
