//! Destination API endpoints.
//!
//! Lookups that fail on the CMS side are answered like missing content, as
//! the content layer already logged the failure.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_destination_type, validate_id, validate_language};
use super::{ApiError, ApiResponse, AppState, DestinationDetail};
use crate::domain::EntityId;
use crate::models::Destination;
use crate::services::{DestinationFilter, SlugTrail, breadcrumb::build_trail};

#[derive(Debug, Default, Deserialize)]
pub struct DestinationQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub region_id: Option<String>,
    pub province_id: Option<String>,
    pub exclude_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SiblingQuery {
    pub province_id: Option<String>,
}

/// # Endpoint
/// `GET /api/{lang}/destinations?type=&region_id=&province_id=&exclude_id=`
pub async fn list_destinations(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
    Query(query): Query<DestinationQuery>,
) -> Result<Json<ApiResponse<Vec<Destination>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let filter = DestinationFilter {
        kind: validate_destination_type(query.kind.as_deref())?,
        region_id: validate_id(query.region_id.as_deref()),
        province_id: validate_id(query.province_id.as_deref()),
        exclude_id: validate_id(query.exclude_id.as_deref()),
    };

    let destinations = state.content().destinations(&filter, &lang).await;
    Ok(Json(ApiResponse::success(destinations.into_vec())))
}

/// Destination page data: the record, its slug trail and page metadata.
///
/// # Endpoint
/// `GET /api/{lang}/destinations/slug/{slug}`
pub async fn get_destination_by_slug(
    State(state): State<Arc<AppState>>,
    Path((lang, slug)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DestinationDetail>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;

    let destination = state
        .content()
        .destination_by_slug(&slug, &lang)
        .await
        .into_option()
        .ok_or_else(|| ApiError::not_found("Destination", &slug))?;

    let trail = build_trail(&destination, &lang);
    let path = trail
        .as_ref()
        .and_then(|t| t.breadcrumb.last())
        .map_or_else(|| format!("/{lang}"), |crumb| crumb.path.clone());
    let metadata = state.seo.for_destination(&destination, &path);

    Ok(Json(ApiResponse::success(DestinationDetail {
        destination,
        trail,
        metadata,
    })))
}

/// # Endpoint
/// `GET /api/{lang}/destinations/{id}/breadcrumb`
pub async fn get_breadcrumb(
    State(state): State<Arc<AppState>>,
    Path((lang, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<SlugTrail>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let id = validate_id(Some(id.as_str()))
        .ok_or_else(|| ApiError::validation("Missing destination ID"))?;

    let trail = state
        .breadcrumbs
        .resolve(&id, &lang)
        .await
        .into_option()
        .ok_or_else(|| ApiError::not_found("Destination", &id))?;

    Ok(Json(ApiResponse::success(trail)))
}

/// Other municipalities of the same province.
///
/// # Endpoint
/// `GET /api/{lang}/destinations/{id}/siblings?province_id=`
pub async fn list_siblings(
    State(state): State<Arc<AppState>>,
    Path((lang, id)): Path<(String, String)>,
    Query(query): Query<SiblingQuery>,
) -> Result<Json<ApiResponse<Vec<Destination>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let province_id: EntityId = validate_id(query.province_id.as_deref())
        .ok_or_else(|| ApiError::validation("province_id is required"))?;
    let id = EntityId::from(id.trim());

    let siblings = state
        .content()
        .sibling_destinations(&id, &province_id, &lang)
        .await;
    Ok(Json(ApiResponse::success(siblings.into_vec())))
}
