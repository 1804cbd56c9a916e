use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_language;
use super::{ApiError, ApiResponse, AppState};
use crate::services::SearchResults;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
    pub lang: Option<String>,
}

/// Ranked destinations and articles matching a free-text query.
///
/// # Endpoint
/// `GET /api/search?q={query}&lang={lang}`
///
/// The language defaults to the site default. A blank query answers with
/// empty result lists.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let site = &state.config().site;
    let lang = validate_language(
        site,
        request.lang.as_deref().unwrap_or(&site.default_language),
    )?;

    let results = state.search_service().search(&request.q, &lang).await;
    Ok(Json(ApiResponse::success(results)))
}
