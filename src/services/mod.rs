pub mod content_service;
pub mod content_service_impl;
pub mod content_snapshot;
pub use content_service::{
    ArticleFilter, CompanyFilter, ContentService, DestinationFilter, Fetch, FetchFailure, Page,
};
pub use content_service_impl::CmsContentService;
pub use content_snapshot::{ContentSnapshot, InMemoryContentService};

pub mod search;
pub use search::{ScoredResult, SearchResults, SearchService};

pub mod breadcrumb;
pub use breadcrumb::{BreadcrumbService, Crumb, SlugTrail};

pub mod sitemap;
pub use sitemap::{ChangeFrequency, SitemapEntry, SitemapService};

pub mod seo;
pub use seo::{PageMetadata, SeoBuilder};
