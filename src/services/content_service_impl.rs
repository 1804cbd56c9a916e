//! Directus-backed implementation of [`ContentService`].

use crate::clients::{CmsClient, Condition, Query};
use crate::domain::EntityId;
use crate::models::{
    Article, Category, Company, CompanyCategory, Destination, DestinationType,
};
use crate::services::content_service::{
    ArticleFilter, CompanyFilter, ContentService, DestinationFilter, Fetch, FetchFailure, Page,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

const DESTINATIONS: &str = "destinations";
const ARTICLES: &str = "articles";
const CATEGORIES: &str = "categorias";
const COMPANIES: &str = "companies";
const COMPANY_CATEGORIES: &str = "company_categories";
const PAGE_TRANSLATIONS: &str = "translations";

const DESTINATION_LIST_FIELDS: &[&str] = &[
    "id",
    "type",
    "image",
    "region_id",
    "province_id",
    "translations.languages_code",
    "translations.destination_name",
    "translations.seo_title",
    "translations.seo_summary",
    "translations.slug_permalink",
];

const DESTINATION_DETAIL_FIELDS: &[&str] = &[
    "id",
    "type",
    "image",
    "region_id.id",
    "region_id.type",
    "region_id.translations.languages_code",
    "region_id.translations.slug_permalink",
    "region_id.translations.destination_name",
    "province_id.id",
    "province_id.type",
    "province_id.translations.languages_code",
    "province_id.translations.slug_permalink",
    "province_id.translations.destination_name",
    "translations.languages_code",
    "translations.destination_name",
    "translations.seo_title",
    "translations.seo_summary",
    "translations.description",
    "translations.slug_permalink",
];

const DESTINATION_SITEMAP_FIELDS: &[&str] = &[
    "id",
    "type",
    "region_id.id",
    "region_id.translations.languages_code",
    "region_id.translations.slug_permalink",
    "province_id.id",
    "province_id.translations.languages_code",
    "province_id.translations.slug_permalink",
    "translations.languages_code",
    "translations.slug_permalink",
];

const ARTICLE_LIST_FIELDS: &[&str] = &[
    "id",
    "image",
    "category_id",
    "date_created",
    "date_updated",
    "featured_status",
    "featured_order",
    "translations.languages_code",
    "translations.titolo_articolo",
    "translations.description",
    "translations.seo_summary",
    "translations.slug_permalink",
];

const ARTICLE_DETAIL_FIELDS: &[&str] = &[
    "id",
    "image",
    "date_created",
    "date_updated",
    "featured_status",
    "category.id",
    "category.translations.languages_code",
    "category.translations.nome_categoria",
    "category.translations.slug_permalink",
    "translations.languages_code",
    "translations.titolo_articolo",
    "translations.description",
    "translations.seo_title",
    "translations.seo_summary",
    "translations.slug_permalink",
];

const COMPANY_FIELDS: &[&str] = &[
    "id",
    "company_name",
    "logo",
    "featured_image",
    "website",
    "email",
    "phone",
    "location",
    "socials",
    "category_id",
    "location_id",
    "active",
    "featured",
    "date_created",
    "translations.*",
];

const CATEGORY_FIELDS: &[&str] = &[
    "id",
    "nome_categoria",
    "image",
    "visible",
    "translations.languages_code",
    "translations.nome_categoria",
    "translations.seo_title",
    "translations.seo_summary",
    "translations.slug_permalink",
];

const COMPANY_CATEGORY_FIELDS: &[&str] = &["id", "sort", "translations.*"];

/// Row of the `translations` collection holding UI strings per page section.
#[derive(Debug, Deserialize)]
struct PageTranslationRow {
    #[serde(default)]
    content: serde_json::Value,
}

pub struct CmsContentService {
    client: CmsClient,
}

impl CmsContentService {
    #[must_use]
    pub const fn new(client: CmsClient) -> Self {
        Self { client }
    }

    /// Runs a query, logging and counting the outcome.
    async fn list<T: DeserializeOwned>(&self, query: &Query) -> Fetch<Vec<T>> {
        let fetched = match self.client.fetch::<T>(query).await {
            Ok(envelope) => Fetch::from_items(envelope.data),
            Err(e) => {
                error!(collection = query.collection(), error = %e, "CMS request failed");
                Fetch::Failed(FetchFailure::from(&e))
            }
        };
        record(query.collection(), &fetched);
        fetched
    }

    async fn first<T: DeserializeOwned>(&self, query: Query) -> Fetch<T> {
        self.list(&query.limit(1)).await.first()
    }

    async fn page<T: DeserializeOwned>(&self, query: &Query) -> Fetch<Page<T>> {
        let fetched = match self.client.fetch::<T>(query).await {
            Ok(envelope) => {
                let total = envelope
                    .total_count()
                    .unwrap_or(envelope.data.len() as u64);
                Fetch::from_page(Page {
                    items: envelope.data,
                    total,
                })
            }
            Err(e) => {
                error!(collection = query.collection(), error = %e, "CMS request failed");
                Fetch::Failed(FetchFailure::from(&e))
            }
        };
        record(query.collection(), &fetched);
        fetched
    }

    fn destination_detail(lang: &str) -> Query {
        Query::items(DESTINATIONS)
            .fields(DESTINATION_DETAIL_FIELDS)
            .localized("translations", lang)
            .localized("region_id.translations", lang)
            .localized("province_id.translations", lang)
    }
}

fn record<T>(collection: &str, fetched: &Fetch<T>) {
    metrics::counter!(
        "cms_requests_total",
        "collection" => collection.to_string(),
        "outcome" => fetched.outcome()
    )
    .increment(1);
}

/// Substring match on `field` of the `lang` row of a translation relation.
fn text_match(relation: &str, field: &str, term: &str, lang: &str) -> Condition {
    Condition::translated(relation, lang, Condition::icontains(field, term))
}

/// Decodes the `content` column, which older rows store as a JSON string.
fn decode_page_content(content: serde_json::Value) -> Result<serde_json::Value, FetchFailure> {
    match content {
        serde_json::Value::String(raw) if raw.trim().is_empty() => Ok(serde_json::Value::Null),
        serde_json::Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|e| FetchFailure::Malformed(format!("translation content: {e}"))),
        other => Ok(other),
    }
}

#[async_trait::async_trait]
impl ContentService for CmsContentService {
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
        let mut query = Query::items(DESTINATIONS)
            .fields(DESTINATION_LIST_FIELDS)
            .localized("translations", lang)
            .limit(-1);

        if let Some(kind) = filter.kind {
            query = query.filter(Condition::eq("type", kind));
        }
        if let Some(region_id) = &filter.region_id {
            query = query.filter(Condition::eq("region_id", region_id));
        }
        if let Some(province_id) = &filter.province_id {
            query = query.filter(Condition::eq("province_id", province_id));
        }
        if let Some(exclude_id) = &filter.exclude_id {
            query = query.filter(Condition::neq("id", exclude_id));
        }

        self.list(&query).await
    }

    async fn destination_by_slug(&self, slug: &str, lang: &str) -> Fetch<Destination> {
        let query = Self::destination_detail(lang)
            .filter(Condition::eq("translations.slug_permalink", slug));
        self.first(query).await
    }

    async fn destination_by_id(&self, id: &EntityId, lang: &str) -> Fetch<Destination> {
        let query = Self::destination_detail(lang).filter(Condition::eq("id", id));
        self.first(query).await
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
        let query = Self::destination_detail(lang)
            .filter(Condition::any_of(vec![
                text_match("translations", "destination_name", term, lang),
                text_match("translations", "seo_summary", term, lang),
                text_match("translations", "description", term, lang),
                text_match("region_id.translations", "destination_name", term, lang),
                text_match("province_id.translations", "destination_name", term, lang),
            ]))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX));

        debug!(term, lang, "Searching destinations");
        self.list(&query).await
    }

    async fn articles(&self, filter: &ArticleFilter, lang: &str) -> Fetch<Page<Article>> {
        let mut query = Query::items(ARTICLES)
            .fields(ARTICLE_LIST_FIELDS)
            .localized("translations", lang)
            .sort_desc("date_created")
            .offset(filter.offset)
            .limit(i64::from(filter.limit.max(1)))
            .with_total_count();

        if let Some(slug) = &filter.category_slug {
            query = query.filter(Condition::eq("category_id.translations.slug_permalink", slug));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(Condition::eq("featured_status", featured.as_str()));
        }

        self.page(&query).await
    }

    async fn article_by_slug(&self, slug: &str, lang: &str) -> Fetch<Article> {
        let query = Query::items(ARTICLES)
            .filter(Condition::eq("translations.slug_permalink", slug))
            .fields(ARTICLE_DETAIL_FIELDS)
            .localized("translations", lang)
            .localized("category.translations", lang);
        self.first(query).await
    }

    async fn articles_by_category(
        &self,
        category_slug: &str,
        lang: &str,
        limit: u32,
    ) -> Fetch<Vec<Article>> {
        let query = Query::items(ARTICLES)
            .filter(Condition::eq(
                "category_id.translations.slug_permalink",
                category_slug,
            ))
            .fields(ARTICLE_LIST_FIELDS)
            .localized("translations", lang)
            .sort_desc("date_created")
            .limit(i64::from(limit.max(1)));
        self.list(&query).await
    }

    async fn search_articles(&self, term: &str, lang: &str, limit: usize) -> Fetch<Vec<Article>> {
        let query = Query::items(ARTICLES)
            .filter(Condition::any_of(vec![
                text_match("translations", "titolo_articolo", term, lang),
                text_match("translations", "seo_summary", term, lang),
                text_match("translations", "description", term, lang),
            ]))
            .fields(ARTICLE_LIST_FIELDS)
            .localized("translations", lang)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX));

        debug!(term, lang, "Searching articles");
        self.list(&query).await
    }

    async fn categories(&self, lang: &str) -> Fetch<Vec<Category>> {
        let query = Query::items(CATEGORIES)
            .filter(Condition::eq("visible", true))
            .fields(CATEGORY_FIELDS)
            .localized("translations", lang);
        self.list(&query).await
    }

    async fn companies(&self, filter: &CompanyFilter, lang: &str) -> Fetch<Vec<Company>> {
        let mut query = Query::items(COMPANIES)
            .filter(Condition::eq("active", true))
            .fields(COMPANY_FIELDS)
            .localized("translations", lang)
            .limit(-1);

        if let Some(category_id) = &filter.category_id {
            query = query.filter(Condition::eq("category_id", category_id));
        }
        if let Some(location_id) = &filter.location_id {
            query = query.filter(Condition::eq("location_id", location_id));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(Condition::eq("featured", featured));
        }

        self.list(&query).await
    }

    async fn company_by_slug(&self, slug: &str, lang: &str) -> Fetch<Company> {
        let query = Query::items(COMPANIES)
            .filter(Condition::eq("translations.slug_permalink", slug))
            .fields(COMPANY_FIELDS)
            .localized("translations", lang);
        self.first(query).await
    }

    async fn company_categories(&self, lang: &str) -> Fetch<Vec<CompanyCategory>> {
        let query = Query::items(COMPANY_CATEGORIES)
            .fields(COMPANY_CATEGORY_FIELDS)
            .localized("translations", lang)
            .sort_asc("sort");
        self.list(&query).await
    }

    async fn page_translations(&self, section: &str, lang: &str) -> Fetch<serde_json::Value> {
        let query = Query::items(PAGE_TRANSLATIONS)
            .filter(Condition::eq("language", lang))
            .filter(Condition::eq("section", section))
            .fields(&["content"]);

        match self.first::<PageTranslationRow>(query).await {
            Fetch::Found(row) => match decode_page_content(row.content) {
                Ok(serde_json::Value::Null) => Fetch::Empty,
                Ok(content) => Fetch::Found(content),
                Err(failure) => {
                    error!(section, lang, error = %failure, "Invalid page translations");
                    Fetch::Failed(failure)
                }
            },
            Fetch::Empty => Fetch::Empty,
            Fetch::Failed(failure) => Fetch::Failed(failure),
        }
    }

    async fn all_destinations(&self) -> Fetch<Vec<Destination>> {
        let query = Query::items(DESTINATIONS)
            .fields(DESTINATION_SITEMAP_FIELDS)
            .limit(-1);
        self.list(&query).await
    }

    async fn all_articles(&self) -> Fetch<Vec<Article>> {
        let query = Query::items(ARTICLES)
            .fields(&[
                "id",
                "date_created",
                "date_updated",
                "translations.languages_code",
                "translations.slug_permalink",
            ])
            .sort_desc("date_created")
            .limit(-1);
        self.list(&query).await
    }

    async fn all_companies(&self) -> Fetch<Vec<Company>> {
        let query = Query::items(COMPANIES)
            .filter(Condition::eq("active", true))
            .fields(&[
                "id",
                "date_created",
                "translations.languages_code",
                "translations.slug_permalink",
            ])
            .limit(-1);
        self.list(&query).await
    }

    async fn check_connection(&self) -> Result<(), FetchFailure> {
        match self.client.current_user().await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(error = %e, "CMS connection check failed");
                Err(FetchFailure::from(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page_content_from_string() {
        let decoded = decode_page_content(json!(r#"{"title": "Benvenuti"}"#)).unwrap();
        assert_eq!(decoded, json!({"title": "Benvenuti"}));
    }

    #[test]
    fn test_decode_page_content_object_passthrough() {
        let decoded = decode_page_content(json!({"title": "Welcome"})).unwrap();
        assert_eq!(decoded["title"], "Welcome");
    }

    #[test]
    fn test_decode_page_content_rejects_invalid_json() {
        let failure = decode_page_content(json!("{not json")).unwrap_err();
        assert!(matches!(failure, FetchFailure::Malformed(_)));
    }
}
