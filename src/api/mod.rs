use axum::{Router, http::HeaderValue, middleware, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::CmsClient;
use crate::config::Config;
use crate::services::{
    BreadcrumbService, CmsContentService, ContentService, InMemoryContentService, SearchService,
    SeoBuilder, SitemapService,
};

mod articles;
mod companies;
mod destinations;
mod error;
mod observability;
mod search;
mod sitemap;
mod system;
mod translations;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub content: Arc<dyn ContentService>,

    pub content_source: ContentSource,

    pub search: Arc<SearchService>,

    pub breadcrumbs: Arc<BreadcrumbService>,

    pub sitemap: Arc<SitemapService>,

    pub seo: Arc<SeoBuilder>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn content(&self) -> &Arc<dyn ContentService> {
        &self.content
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<SearchService> {
        &self.search
    }
}

/// Builds the content backend: the offline snapshot when one is configured,
/// the live CMS otherwise.
pub fn content_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn ContentService>, ContentSource)> {
    if let Some(path) = config.cms.snapshot_path.as_deref() {
        let service = InMemoryContentService::load(Path::new(path))?;
        return Ok((Arc::new(service), ContentSource::Snapshot));
    }

    let client = CmsClient::new(&config.cms)
        .map_err(|e| anyhow::anyhow!("Failed to create CMS client: {e}"))?;
    Ok((
        Arc::new(CmsContentService::new(client)),
        ContentSource::Cms,
    ))
}

#[must_use]
pub fn create_app_state(
    config: Config,
    content: Arc<dyn ContentService>,
    content_source: ContentSource,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let search = Arc::new(SearchService::new(
        content.clone(),
        config.search.candidate_limit,
    ));
    let breadcrumbs = Arc::new(BreadcrumbService::new(content.clone()));
    let sitemap = Arc::new(SitemapService::new(content.clone(), &config.site));
    let seo = Arc::new(SeoBuilder::new(&config.site, &config.cms));

    Arc::new(AppState {
        config: Arc::new(config),
        content,
        content_source,
        search,
        breadcrumbs,
        sitemap,
        seo,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let (content, source) = content_from_config(&config)?;
    Ok(create_app_state(config, content, source, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/search", get(search::search))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .merge(content_routes());

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/sitemap.xml", get(sitemap::get_sitemap))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn content_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{lang}/destinations",
            get(destinations::list_destinations),
        )
        .route(
            "/{lang}/destinations/slug/{slug}",
            get(destinations::get_destination_by_slug),
        )
        .route(
            "/{lang}/destinations/{id}/breadcrumb",
            get(destinations::get_breadcrumb),
        )
        .route(
            "/{lang}/destinations/{id}/siblings",
            get(destinations::list_siblings),
        )
        .route("/{lang}/articles", get(articles::list_articles))
        .route("/{lang}/articles/{slug}", get(articles::get_article))
        .route("/{lang}/categories", get(articles::list_categories))
        .route(
            "/{lang}/categories/{slug}/articles",
            get(articles::list_category_articles),
        )
        .route("/{lang}/companies", get(companies::list_companies))
        .route("/{lang}/companies/{slug}", get(companies::get_company))
        .route(
            "/{lang}/company-categories",
            get(companies::list_company_categories),
        )
        .route(
            "/{lang}/translations/{section}",
            get(translations::get_translations),
        )
}
