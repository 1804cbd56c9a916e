use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_featured_status, validate_language, validate_limit};
use super::{ApiError, ApiResponse, AppState, ArticleDetail, ArticlePage};
use crate::models::{Article, Category};
use crate::services::ArticleFilter;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub featured: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
}

/// Newest articles first, one page at a time.
///
/// # Endpoint
/// `GET /api/{lang}/articles?offset=&limit=&category=&featured=`
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<ApiResponse<ArticlePage>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let filter = ArticleFilter {
        offset: query.offset.unwrap_or(0),
        limit: validate_limit(query.limit.unwrap_or(DEFAULT_PAGE_SIZE))?,
        category_slug: query
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        featured: validate_featured_status(query.featured.as_deref())?,
    };

    let page = state.content().articles(&filter, &lang).await.into_page();
    Ok(Json(ApiResponse::success(ArticlePage {
        items: page.items,
        total: page.total,
        offset: filter.offset,
        limit: filter.limit,
    })))
}

/// # Endpoint
/// `GET /api/{lang}/articles/{slug}`
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path((lang, slug)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ArticleDetail>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;

    let article = state
        .content()
        .article_by_slug(&slug, &lang)
        .await
        .into_option()
        .ok_or_else(|| ApiError::not_found("Article", &slug))?;
    let metadata = state.seo.for_article(&article, &lang);

    Ok(Json(ApiResponse::success(ArticleDetail { article, metadata })))
}

/// # Endpoint
/// `GET /api/{lang}/categories`
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Path(lang): Path<String>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let categories = state.content().categories(&lang).await;
    Ok(Json(ApiResponse::success(categories.into_vec())))
}

/// # Endpoint
/// `GET /api/{lang}/categories/{slug}/articles?limit=`
pub async fn list_category_articles(
    State(state): State<Arc<AppState>>,
    Path((lang, slug)): Path<(String, String)>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<Article>>>, ApiError> {
    let lang = validate_language(&state.config().site, &lang)?;
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_PAGE_SIZE))?;

    let articles = state
        .content()
        .articles_by_category(&slug, &lang, limit)
        .await;
    Ok(Json(ApiResponse::success(articles.into_vec())))
}
