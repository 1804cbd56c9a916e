//! [`ContentService`] served from a JSON snapshot of the CMS collections.
//!
//! Used for offline runs and as the fixture behind the integration tests. The
//! filtering mirrors what the Directus queries in
//! [`CmsContentService`](super::CmsContentService) ask the backend for.

use crate::domain::EntityId;
use crate::models::{
    Article, ArticleCategory, Category, Company, CompanyCategory, Destination, DestinationSummary,
    DestinationType, Relation, article::ArticleCategoryName,
};
use crate::services::content_service::{
    ArticleFilter, CompanyFilter, ContentService, DestinationFilter, Fetch, FetchFailure, Page,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSnapshot {
    pub destinations: Vec<Destination>,
    pub articles: Vec<Article>,
    pub categories: Vec<Category>,
    pub companies: Vec<Company>,
    pub company_categories: Vec<CompanyCategory>,
    /// `section -> language -> document`
    pub page_translations: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

pub struct InMemoryContentService {
    snapshot: ContentSnapshot,
}

impl InMemoryContentService {
    #[must_use]
    pub const fn new(snapshot: ContentSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let snapshot: ContentSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

        info!(
            destinations = snapshot.destinations.len(),
            articles = snapshot.articles.len(),
            companies = snapshot.companies.len(),
            "Loaded content snapshot from {}",
            path.display()
        );

        Ok(Self::new(snapshot))
    }

    fn find_destination(&self, id: &EntityId) -> Option<&Destination> {
        self.snapshot.destinations.iter().find(|d| &d.id == id)
    }

    /// Replaces a parent reference by the parent's summary, restricted to
    /// `lang` when given. Unknown parents are left untouched.
    fn expand_parent(
        &self,
        parent: &Relation<DestinationSummary>,
        lang: Option<&str>,
    ) -> Relation<DestinationSummary> {
        let id = match parent {
            Relation::Id(id) => Some(id),
            Relation::Expanded(summary) => summary.id.as_ref(),
        };

        match id.and_then(|id| self.find_destination(id)) {
            Some(found) => Relation::Expanded(Box::new(DestinationSummary {
                id: Some(found.id.clone()),
                kind: Some(found.kind),
                translations: match lang {
                    Some(lang) => localized(&found.translations, lang, |t| {
                        t.languages_code.as_deref()
                    }),
                    None => found.translations.clone(),
                },
            })),
            None => parent.clone(),
        }
    }

    fn with_parents(&self, destination: &Destination, lang: Option<&str>) -> Destination {
        let mut expanded = destination.clone();
        expanded.region_id = destination
            .region_id
            .as_ref()
            .map(|parent| self.expand_parent(parent, lang));
        expanded.province_id = destination
            .province_id
            .as_ref()
            .map(|parent| self.expand_parent(parent, lang));
        if let Some(lang) = lang {
            expanded.translations =
                localized(&destination.translations, lang, |t| t.languages_code.as_deref());
        }
        expanded
    }

    fn article_category_id(article: &Article) -> Option<&EntityId> {
        match article.category.as_ref()? {
            Relation::Id(id) => Some(id),
            Relation::Expanded(category) => category.id.as_ref(),
        }
    }

    fn in_category(&self, article: &Article, slug: &str) -> bool {
        Self::article_category_id(article)
            .and_then(|id| self.snapshot.categories.iter().find(|c| &c.id == id))
            .is_some_and(|category| category.slug_matches(slug))
    }

    fn expand_category(&self, article: &Article, lang: &str) -> Option<Relation<ArticleCategory>> {
        let id = Self::article_category_id(article)?;
        let Some(category) = self.snapshot.categories.iter().find(|c| &c.id == id) else {
            return article.category.clone();
        };

        let translations = category
            .translations
            .iter()
            .filter(|t| t.languages_code.as_deref() == Some(lang))
            .map(|t| ArticleCategoryName {
                languages_code: t.languages_code.clone(),
                name: t.name.clone(),
                slug_permalink: t.slug_permalink.clone(),
            })
            .collect();

        Some(Relation::Expanded(Box::new(ArticleCategory {
            id: Some(category.id.clone()),
            translations,
        })))
    }

    fn localized_article(article: &Article, lang: &str) -> Article {
        Article {
            translations: localized(&article.translations, lang, |t| t.languages_code.as_deref()),
            ..article.clone()
        }
    }

    fn localized_company(company: &Company, lang: &str) -> Company {
        Company {
            translations: localized(&company.translations, lang, |t| t.languages_code.as_deref()),
            ..company.clone()
        }
    }

    /// Articles newest first, keeping snapshot order among equal dates.
    fn articles_by_date(&self) -> Vec<&Article> {
        let mut articles: Vec<&Article> = self.snapshot.articles.iter().collect();
        articles.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        articles
    }
}

fn localized<T: Clone>(
    translations: &[T],
    lang: &str,
    code: impl Fn(&T) -> Option<&str>,
) -> Vec<T> {
    translations
        .iter()
        .filter(|t| code(t) == Some(lang))
        .cloned()
        .collect()
}

fn contains(field: Option<&String>, term: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(term))
}

fn parent_name_contains(parent: Option<&DestinationSummary>, term: &str) -> bool {
    parent.is_some_and(|summary| {
        summary
            .translations
            .iter()
            .any(|t| contains(t.destination_name.as_ref(), term))
    })
}

#[async_trait::async_trait]
impl ContentService for InMemoryContentService {
    async fn destinations_by_type(
        &self,
        kind: DestinationType,
        lang: &str,
    ) -> Fetch<Vec<Destination>> {
        self.destinations(&DestinationFilter::of_kind(kind), lang)
            .await
    }

    async fn destinations(
        &self,
        filter: &DestinationFilter,
        lang: &str,
    ) -> Fetch<Vec<Destination>> {
        let parent_is = |parent: Option<&Relation<DestinationSummary>>, wanted: &EntityId| {
            parent.is_some_and(|relation| match relation {
                Relation::Id(id) => id == wanted,
                Relation::Expanded(summary) => summary.id.as_ref() == Some(wanted),
            })
        };

        let matches = self
            .snapshot
            .destinations
            .iter()
            .filter(|d| filter.kind.is_none_or(|kind| d.kind == kind))
            .filter(|d| {
                filter
                    .region_id
                    .as_ref()
                    .is_none_or(|id| parent_is(d.region_id.as_ref(), id))
            })
            .filter(|d| {
                filter
                    .province_id
                    .as_ref()
                    .is_none_or(|id| parent_is(d.province_id.as_ref(), id))
            })
            .filter(|d| filter.exclude_id.as_ref() != Some(&d.id))
            .map(|d| Destination {
                translations: localized(&d.translations, lang, |t| t.languages_code.as_deref()),
                ..d.clone()
            })
            .collect();

        Fetch::from_items(matches)
    }

    async fn destination_by_slug(&self, slug: &str, lang: &str) -> Fetch<Destination> {
        let found = self.snapshot.destinations.iter().find(|d| {
            d.translations
                .iter()
                .any(|t| t.slug_permalink.as_deref() == Some(slug))
        });
        Fetch::from_option(found.map(|d| self.with_parents(d, Some(lang))))
    }

    async fn destination_by_id(&self, id: &EntityId, lang: &str) -> Fetch<Destination> {
        Fetch::from_option(
            self.find_destination(id)
                .map(|d| self.with_parents(d, Some(lang))),
        )
    }

    async fn sibling_destinations(
        &self,
        id: &EntityId,
        province_id: &EntityId,
        lang: &str,
    ) -> Fetch<Vec<Destination>> {
        let filter = DestinationFilter {
            province_id: Some(province_id.clone()),
            exclude_id: Some(id.clone()),
            ..DestinationFilter::default()
        };
        self.destinations(&filter, lang).await
    }

    async fn search_destinations(
        &self,
        term: &str,
        lang: &str,
        limit: usize,
    ) -> Fetch<Vec<Destination>> {
        let term = term.to_lowercase();
        debug!(term, lang, "Searching snapshot destinations");

        let candidates = self
            .snapshot
            .destinations
            .iter()
            .map(|d| self.with_parents(d, Some(lang)))
            .filter(|d| {
                d.translations.iter().any(|t| {
                    contains(t.destination_name.as_ref(), &term)
                        || contains(t.seo_summary.as_ref(), &term)
                        || contains(t.description.as_ref(), &term)
                }) || parent_name_contains(d.region(), &term)
                    || parent_name_contains(d.province(), &term)
            })
            .take(limit)
            .collect();

        Fetch::from_items(candidates)
    }

    async fn articles(&self, filter: &ArticleFilter, lang: &str) -> Fetch<Page<Article>> {
        let matching: Vec<&Article> = self
            .articles_by_date()
            .into_iter()
            .filter(|a| {
                filter
                    .category_slug
                    .as_deref()
                    .is_none_or(|slug| self.in_category(a, slug))
            })
            .filter(|a| filter.featured.is_none_or(|status| a.featured_status == status))
            .collect();

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit.max(1) as usize)
            .map(|a| Self::localized_article(a, lang))
            .collect();

        Fetch::from_page(Page { items, total })
    }

    async fn article_by_slug(&self, slug: &str, lang: &str) -> Fetch<Article> {
        let found = self.snapshot.articles.iter().find(|a| {
            a.translations
                .iter()
                .any(|t| t.slug_permalink.as_deref() == Some(slug))
        });

        Fetch::from_option(found.map(|a| Article {
            category: self.expand_category(a, lang),
            ..Self::localized_article(a, lang)
        }))
    }

    async fn articles_by_category(
        &self,
        category_slug: &str,
        lang: &str,
        limit: u32,
    ) -> Fetch<Vec<Article>> {
        let items = self
            .articles_by_date()
            .into_iter()
            .filter(|a| self.in_category(a, category_slug))
            .take(limit.max(1) as usize)
            .map(|a| Self::localized_article(a, lang))
            .collect();
        Fetch::from_items(items)
    }

    async fn search_articles(&self, term: &str, lang: &str, limit: usize) -> Fetch<Vec<Article>> {
        let term = term.to_lowercase();
        debug!(term, lang, "Searching snapshot articles");

        let candidates = self
            .snapshot
            .articles
            .iter()
            .filter(|a| {
                a.translations.iter().any(|t| {
                    contains(t.title.as_ref(), &term)
                        || contains(t.seo_summary.as_ref(), &term)
                        || contains(t.description.as_ref(), &term)
                })
            })
            .take(limit)
            .map(|a| Self::localized_article(a, lang))
            .collect();

        Fetch::from_items(candidates)
    }

    async fn categories(&self, lang: &str) -> Fetch<Vec<Category>> {
        let items = self
            .snapshot
            .categories
            .iter()
            .filter(|c| c.visible)
            .map(|c| Category {
                translations: localized(&c.translations, lang, |t| t.languages_code.as_deref()),
                ..c.clone()
            })
            .collect();
        Fetch::from_items(items)
    }

    async fn companies(&self, filter: &CompanyFilter, lang: &str) -> Fetch<Vec<Company>> {
        let items = self
            .snapshot
            .companies
            .iter()
            .filter(|c| c.active)
            .filter(|c| {
                filter
                    .category_id
                    .as_ref()
                    .is_none_or(|id| c.category_id.as_ref() == Some(id))
            })
            .filter(|c| {
                filter
                    .location_id
                    .as_ref()
                    .is_none_or(|id| c.location_id.as_ref() == Some(id))
            })
            .filter(|c| filter.featured.is_none_or(|featured| c.featured == featured))
            .map(|c| Self::localized_company(c, lang))
            .collect();
        Fetch::from_items(items)
    }

    async fn company_by_slug(&self, slug: &str, lang: &str) -> Fetch<Company> {
        let found = self.snapshot.companies.iter().find(|c| {
            c.translations
                .iter()
                .any(|t| t.slug_permalink.as_deref() == Some(slug))
        });
        Fetch::from_option(found.map(|c| Self::localized_company(c, lang)))
    }

    async fn company_categories(&self, lang: &str) -> Fetch<Vec<CompanyCategory>> {
        let mut items: Vec<CompanyCategory> = self
            .snapshot
            .company_categories
            .iter()
            .map(|c| CompanyCategory {
                translations: localized(&c.translations, lang, |t| t.languages_code.as_deref()),
                ..c.clone()
            })
            .collect();
        items.sort_by_key(|c| (c.sort.is_none(), c.sort));
        Fetch::from_items(items)
    }

    async fn page_translations(&self, section: &str, lang: &str) -> Fetch<serde_json::Value> {
        Fetch::from_option(
            self.snapshot
                .page_translations
                .get(section)
                .and_then(|by_lang| by_lang.get(lang))
                .filter(|content| !content.is_null())
                .cloned(),
        )
    }

    async fn all_destinations(&self) -> Fetch<Vec<Destination>> {
        Fetch::from_items(
            self.snapshot
                .destinations
                .iter()
                .map(|d| self.with_parents(d, None))
                .collect(),
        )
    }

    async fn all_articles(&self) -> Fetch<Vec<Article>> {
        Fetch::from_items(self.articles_by_date().into_iter().cloned().collect())
    }

    async fn all_companies(&self) -> Fetch<Vec<Company>> {
        Fetch::from_items(
            self.snapshot
                .companies
                .iter()
                .filter(|c| c.active)
                .cloned()
                .collect(),
        )
    }

    async fn check_connection(&self) -> Result<(), FetchFailure> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> InMemoryContentService {
        let snapshot: ContentSnapshot = serde_json::from_value(json!({
            "destinations": [
                {"id": 1, "type": "region", "translations": [
                    {"languages_code": "it", "destination_name": "Lazio", "slug_permalink": "lazio"},
                    {"languages_code": "en", "destination_name": "Latium", "slug_permalink": "latium"}
                ]},
                {"id": 2, "type": "province", "region_id": 1, "translations": [
                    {"languages_code": "it", "destination_name": "Roma", "slug_permalink": "roma"}
                ]},
                {"id": 3, "type": "municipality", "region_id": 1, "province_id": 2, "translations": [
                    {"languages_code": "it", "destination_name": "Tivoli", "slug_permalink": "tivoli"}
                ]},
                {"id": 4, "type": "municipality", "region_id": 1, "province_id": 2, "translations": [
                    {"languages_code": "it", "destination_name": "Frascati", "slug_permalink": "frascati"}
                ]}
            ],
            "articles": [
                {"id": 10, "date_created": "2024-01-01T00:00:00Z", "category_id": 7,
                 "translations": [{"languages_code": "it", "titolo_articolo": "Vecchio", "slug_permalink": "vecchio"}]},
                {"id": 11, "date_created": "2024-06-01T00:00:00Z", "featured_status": "top",
                 "translations": [{"languages_code": "it", "titolo_articolo": "Nuovo", "slug_permalink": "nuovo"}]}
            ],
            "categories": [
                {"id": 7, "visible": true, "translations": [
                    {"languages_code": "it", "nome_categoria": "Cucina", "slug_permalink": "cucina"}
                ]},
                {"id": 8, "visible": false}
            ],
            "companies": [
                {"id": 20, "active": true, "featured": true, "category_id": 5,
                 "translations": [{"languages_code": "it", "name": "Enoteca", "slug_permalink": "enoteca"}]},
                {"id": 21, "active": false, "translations": []}
            ],
            "page_translations": {"home": {"it": {"title": "Benvenuti"}}}
        }))
        .unwrap();
        InMemoryContentService::new(snapshot)
    }

    #[tokio::test]
    async fn test_localizes_and_keeps_untranslated_records() {
        let service = service();
        let regions = service
            .destinations_by_type(DestinationType::Region, "en")
            .await
            .into_vec();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name(), Some("Latium"));

        let provinces = service
            .destinations_by_type(DestinationType::Province, "en")
            .await
            .into_vec();
        assert_eq!(provinces.len(), 1);
        assert!(!provinces[0].is_translated());
    }

    #[tokio::test]
    async fn test_detail_expands_parents() {
        let service = service();
        let tivoli = service
            .destination_by_slug("tivoli", "it")
            .await
            .into_option()
            .unwrap();

        assert_eq!(tivoli.region().and_then(DestinationSummary::slug), Some("lazio"));
        assert_eq!(tivoli.province().and_then(DestinationSummary::name), Some("Roma"));
        assert_eq!(service.destination_by_slug("milano", "it").await, Fetch::Empty);
    }

    #[tokio::test]
    async fn test_siblings_exclude_self() {
        let service = service();
        let siblings = service
            .sibling_destinations(&EntityId::new("3"), &EntityId::new("2"), "it")
            .await
            .into_vec();
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].slug(), Some("frascati"));
    }

    #[tokio::test]
    async fn test_articles_paging_and_filters() {
        let service = service();
        let page = service
            .articles(&ArticleFilter::default(), "it")
            .await
            .into_page();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].slug(), Some("nuovo"));

        let featured = ArticleFilter {
            featured: Some(crate::models::FeaturedStatus::Top),
            ..ArticleFilter::default()
        };
        assert_eq!(service.articles(&featured, "it").await.into_page().total, 1);

        let by_category = service.articles_by_category("cucina", "it", 10).await.into_vec();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].slug(), Some("vecchio"));
    }

    #[tokio::test]
    async fn test_article_detail_expands_category() {
        let article = service()
            .article_by_slug("vecchio", "it")
            .await
            .into_option()
            .unwrap();
        assert_eq!(article.category_name(), Some("Cucina"));
    }

    #[tokio::test]
    async fn test_companies_only_active_and_visible_categories() {
        let service = service();
        assert_eq!(
            service.companies(&CompanyFilter::default(), "it").await.into_vec().len(),
            1
        );
        assert_eq!(service.categories("it").await.into_vec().len(), 1);
        assert_eq!(service.all_companies().await.into_vec().len(), 1);
    }

    #[tokio::test]
    async fn test_page_translations() {
        let service = service();
        assert_eq!(
            service.page_translations("home", "it").await,
            Fetch::Found(json!({"title": "Benvenuti"}))
        );
        assert_eq!(service.page_translations("home", "en").await, Fetch::Empty);
    }
}
