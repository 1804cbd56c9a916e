use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_language};
use super::{ApiError, ApiResponse, AppState, CompanyDetail};
use crate::models::{Company, CompanyCategory};
use crate::services::CompanyFilter;

#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    pub category_id: Option<String>,
    pub location_id: Option<String>,
    pub featured: Option<bool>,
}

/// Active companies, optionally narrowed by category, location or the
/// featured flag.
///
/// # Endpoint
/// `GET /api/{lang}/companies?category_id=&location_id=&featured=`
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<Company>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let filter = CompanyFilter {
        category_id: validate_id(query.category_id.as_deref()),
        location_id: validate_id(query.location_id.as_deref()),
        featured: query.featured,
    };

    let companies = state.content().companies(&filter, &lang).await;
    Ok(Json(ApiResponse::success(companies.into_vec())))
}

/// # Endpoint
/// `GET /api/{lang}/companies/{slug}`
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    Path((lang, slug)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CompanyDetail>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;

    let company = state
        .content()
        .company_by_slug(&slug, &lang)
        .await
        .into_option()
        .ok_or_else(|| ApiError::not_found("Company", &slug))?;
    let metadata = state.seo.for_company(&company, &lang);

    Ok(Json(ApiResponse::success(CompanyDetail { company, metadata })))
}

/// # Endpoint
/// `GET /api/{lang}/company-categories`
pub async fn list_company_categories(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
) -> Result<Json<ApiResponse<Vec<CompanyCategory>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let categories = state.content().company_categories(&lang).await;
    Ok(Json(ApiResponse::success(categories.into_vec())))
}
