//! Content access layer.
//!
//! Every read against the CMS goes through [`ContentService`]. Operations
//! never return an error: transport failures and malformed payloads are
//! logged at the boundary and reported as [`Fetch::Failed`], which default
//! consumers treat like an empty result so pages degrade instead of failing.

use crate::clients::CmsError;
use crate::domain::EntityId;
use crate::models::{
    Article, Category, Company, CompanyCategory, Destination, DestinationType, FeaturedStatus,
};
use serde::Serialize;
use thiserror::Error;

/// Why a fetch produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchFailure {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend responded with status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<&CmsError> for FetchFailure {
    fn from(err: &CmsError) -> Self {
        match err {
            CmsError::Status { status } => Self::Status(*status),
            CmsError::Decode(e) => Self::Malformed(e.to_string()),
            CmsError::InvalidUrl(e) => Self::Unreachable(e.to_string()),
            CmsError::Transport(e) if e.is_decode() => Self::Malformed(e.to_string()),
            CmsError::Transport(e) => Self::Unreachable(e.to_string()),
        }
    }
}

/// Result of a content read.
///
/// `Empty` means the backend answered and nothing matched. `Failed` means the
/// backend could not be asked or its answer could not be understood.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Found(T),
    Empty,
    Failed(FetchFailure),
}

impl<T> Fetch<T> {
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Found(_) | Self::Empty => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetch<U> {
        match self {
            Self::Found(value) => Fetch::Found(f(value)),
            Self::Empty => Fetch::Empty,
            Self::Failed(failure) => Fetch::Failed(failure),
        }
    }

    /// Label used for the `outcome` metric dimension.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Self::Found)
    }
}

impl<T> Fetch<Vec<T>> {
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Found(items)
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }

    /// Keeps only the first item.
    #[must_use]
    pub fn first(self) -> Fetch<T> {
        match self {
            Self::Found(items) => Fetch::from_option(items.into_iter().next()),
            Self::Empty => Fetch::Empty,
            Self::Failed(failure) => Fetch::Failed(failure),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching records, regardless of paging
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Fetch<Page<T>> {
    #[must_use]
    pub fn from_page(page: Page<T>) -> Self {
        if page.items.is_empty() && page.total == 0 {
            Self::Empty
        } else {
            Self::Found(page)
        }
    }

    #[must_use]
    pub fn into_page(self) -> Page<T> {
        self.into_option().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationFilter {
    pub kind: Option<DestinationType>,
    pub region_id: Option<EntityId>,
    pub province_id: Option<EntityId>,
    pub exclude_id: Option<EntityId>,
}

impl DestinationFilter {
    #[must_use]
    pub fn of_kind(kind: DestinationType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFilter {
    pub offset: u32,
    pub limit: u32,
    pub category_slug: Option<String>,
    pub featured: Option<FeaturedStatus>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
            category_slug: None,
            featured: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub category_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub featured: Option<bool>,
}

/// Read access to the site content.
///
/// `lang` restricts embedded translations to that language. A record without
/// a translation in `lang` is still returned, with empty `translations`.
///
/// # Examples
///
/// ```rust,ignore
/// use belpaese::services::{ContentService, Fetch};
/// use std::sync::Arc;
///
/// async fn example(content: Arc<dyn ContentService>) {
///     match content.destination_by_slug("roma", "it").await {
///         Fetch::Found(destination) => println!("{:?}", destination.name()),
///         Fetch::Empty => println!("no such destination"),
///         Fetch::Failed(reason) => println!("CMS unavailable: {reason}"),
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    /// All destinations of one level.
    async fn destinations_by_type(&self, kind: DestinationType, lang: &str)
    -> Fetch<Vec<Destination>>;

    /// Destinations matching every set field of `filter`.
    async fn destinations(&self, filter: &DestinationFilter, lang: &str)
    -> Fetch<Vec<Destination>>;

    /// Destination whose translation has `slug`, with its ancestors' names
    /// and slugs expanded.
    async fn destination_by_slug(&self, slug: &str, lang: &str) -> Fetch<Destination>;

    /// Destination by id, with its ancestors' names and slugs expanded.
    async fn destination_by_id(&self, id: &EntityId, lang: &str) -> Fetch<Destination>;

    /// Destinations in `province_id`, excluding `id` itself.
    async fn sibling_destinations(
        &self,
        id: &EntityId,
        province_id: &EntityId,
        lang: &str,
    ) -> Fetch<Vec<Destination>>;

    /// Search candidates: destinations whose own text or parent names contain
    /// `term`. Ancestors are expanded so callers can score and link them.
    async fn search_destinations(
        &self,
        term: &str,
        lang: &str,
        limit: usize,
    ) -> Fetch<Vec<Destination>>;

    /// Newest articles first, with the total count for pagination.
    async fn articles(&self, filter: &ArticleFilter, lang: &str) -> Fetch<Page<Article>>;

    async fn article_by_slug(&self, slug: &str, lang: &str) -> Fetch<Article>;

    async fn articles_by_category(
        &self,
        category_slug: &str,
        lang: &str,
        limit: u32,
    ) -> Fetch<Vec<Article>>;

    /// Search candidates: articles whose title, summary or description
    /// contain `term`.
    async fn search_articles(&self, term: &str, lang: &str, limit: usize) -> Fetch<Vec<Article>>;

    /// Visible magazine categories.
    async fn categories(&self, lang: &str) -> Fetch<Vec<Category>>;

    /// Active companies matching `filter`.
    async fn companies(&self, filter: &CompanyFilter, lang: &str) -> Fetch<Vec<Company>>;

    async fn company_by_slug(&self, slug: &str, lang: &str) -> Fetch<Company>;

    async fn company_categories(&self, lang: &str) -> Fetch<Vec<CompanyCategory>>;

    /// UI strings of one page section, as a JSON document.
    async fn page_translations(&self, section: &str, lang: &str) -> Fetch<serde_json::Value>;

    /// Every destination with translations in every language. Ancestors carry
    /// their slugs and language codes.
    async fn all_destinations(&self) -> Fetch<Vec<Destination>>;

    /// Every article with translations in every language.
    async fn all_articles(&self) -> Fetch<Vec<Article>>;

    /// Every active company with translations in every language.
    async fn all_companies(&self) -> Fetch<Vec<Company>>;

    /// Verifies the backend is reachable and accepts the configured
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchFailure`] that prevented the check.
    async fn check_connection(&self) -> Result<(), FetchFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_distinguishes_empty() {
        assert_eq!(Fetch::<Vec<i32>>::from_items(vec![]), Fetch::Empty);
        assert_eq!(Fetch::from_items(vec![1, 2]), Fetch::Found(vec![1, 2]));
    }

    #[test]
    fn test_failed_collapses_to_empty() {
        let failed: Fetch<Vec<i32>> = Fetch::Failed(FetchFailure::Status(500));
        assert!(failed.is_failed());
        assert_eq!(failed.outcome(), "failed");
        assert!(failed.into_vec().is_empty());

        let missing: Fetch<i32> = Fetch::Failed(FetchFailure::Unreachable("refused".into()));
        assert_eq!(missing.into_option(), None);
    }

    #[test]
    fn test_first_and_map() {
        let fetched = Fetch::from_items(vec!["a", "b"]).first().map(str::len);
        assert_eq!(fetched, Fetch::Found(1));
        assert_eq!(Fetch::<Vec<&str>>::Empty.first(), Fetch::Empty);
    }

    #[test]
    fn test_page_with_total_but_no_items_is_found() {
        let page: Page<i32> = Page {
            items: vec![],
            total: 30,
        };
        assert!(matches!(Fetch::from_page(page), Fetch::Found(_)));
        assert_eq!(Fetch::from_page(Page::<i32>::default()), Fetch::Empty);
    }

    #[test]
    fn test_status_error_maps_to_status_failure() {
        let failure = FetchFailure::from(&CmsError::Status { status: 503 });
        assert_eq!(failure, FetchFailure::Status(503));
    }
}
