//! XML sitemap of every localized page.

use crate::config::SiteConfig;
use crate::models::{Article, Company, Destination, DestinationSummary, DestinationType};
use crate::services::content_service::ContentService;
use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
}

#[derive(Serialize)]
#[serde(rename = "urlset")]
struct UrlSet<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    url: Vec<UrlElement<'a>>,
}

#[derive(Serialize)]
struct UrlElement<'a> {
    loc: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lastmod: Option<String>,
    changefreq: &'static str,
    priority: String,
}

/// Renders entries as a `<urlset>` document.
pub fn render(entries: &[SitemapEntry]) -> Result<String> {
    let urlset = UrlSet {
        xmlns: SITEMAP_NS,
        url: entries
            .iter()
            .map(|entry| UrlElement {
                loc: &entry.loc,
                lastmod: entry
                    .lastmod
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                changefreq: entry.changefreq.as_str(),
                priority: format!("{:.1}", entry.priority),
            })
            .collect(),
    };

    let body = quick_xml::se::to_string(&urlset)
        .map_err(|e| anyhow!("Failed to serialize sitemap: {e}"))?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}"))
}

/// Route of a destination translation: region, province and municipality
/// segments down to the destination itself.
fn destination_route(destination: &Destination, lang: &str, slug: &str) -> Option<String> {
    fn ancestor<'a>(parent: Option<&'a DestinationSummary>, lang: &str) -> Option<&'a str> {
        parent?.slug_in(lang)
    }

    match destination.kind {
        DestinationType::Region => Some(format!("{lang}/{slug}")),
        DestinationType::Province => {
            let region = ancestor(destination.region(), lang)?;
            Some(format!("{lang}/{region}/{slug}"))
        }
        DestinationType::Municipality => {
            let region = ancestor(destination.region(), lang)?;
            let province = ancestor(destination.province(), lang)?;
            Some(format!("{lang}/{region}/{province}/{slug}"))
        }
    }
}

pub struct SitemapService {
    content: Arc<dyn ContentService>,
    site_url: String,
    languages: Vec<String>,
}

impl SitemapService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentService>, site: &SiteConfig) -> Self {
        Self {
            content,
            site_url: site.root_url().to_string(),
            languages: site.supported_languages.clone(),
        }
    }

    fn supports(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    fn static_entries(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let pages = [
            ("", ChangeFrequency::Daily, 1.0),
            ("/magazine", ChangeFrequency::Daily, 0.9),
            ("/companies", ChangeFrequency::Weekly, 0.8),
            ("/experience", ChangeFrequency::Weekly, 0.8),
        ];

        self.languages
            .iter()
            .flat_map(|lang| {
                pages.iter().map(move |(page, changefreq, priority)| SitemapEntry {
                    loc: format!("{}/{lang}{page}", self.site_url),
                    lastmod: Some(now),
                    changefreq: *changefreq,
                    priority: *priority,
                })
            })
            .collect()
    }

    fn article_entries(&self, articles: &[Article]) -> Vec<SitemapEntry> {
        articles
            .iter()
            .flat_map(|article| {
                article.translations.iter().filter_map(move |t| {
                    let lang = t.languages_code.as_deref().filter(|l| self.supports(l))?;
                    let slug = t.slug_permalink.as_deref().filter(|s| !s.is_empty())?;
                    Some(SitemapEntry {
                        loc: format!("{}/{lang}/magazine/{slug}", self.site_url),
                        lastmod: article.last_modified(),
                        changefreq: ChangeFrequency::Monthly,
                        priority: 0.7,
                    })
                })
            })
            .collect()
    }

    fn company_entries(&self, companies: &[Company]) -> Vec<SitemapEntry> {
        companies
            .iter()
            .flat_map(|company| {
                company.translations.iter().filter_map(move |t| {
                    let lang = t.languages_code.as_deref().filter(|l| self.supports(l))?;
                    let slug = t.slug_permalink.as_deref().filter(|s| !s.is_empty())?;
                    Some(SitemapEntry {
                        loc: format!("{}/{lang}/companies/{slug}", self.site_url),
                        lastmod: company.date_created,
                        changefreq: ChangeFrequency::Weekly,
                        priority: 0.8,
                    })
                })
            })
            .collect()
    }

    fn destination_entries(
        &self,
        destinations: &[Destination],
        now: DateTime<Utc>,
    ) -> Vec<SitemapEntry> {
        destinations
            .iter()
            .filter(|destination| {
                let consistent = destination.has_consistent_ancestry();
                if !consistent {
                    warn!(
                        id = %destination.id,
                        kind = destination.kind.as_str(),
                        "Destination parents do not match its level, leaving it out of the sitemap"
                    );
                }
                consistent
            })
            .flat_map(|destination| {
                destination.translations.iter().filter_map(move |t| {
                    let lang = t.languages_code.as_deref().filter(|l| self.supports(l))?;
                    let slug = t.slug_permalink.as_deref().filter(|s| !s.is_empty())?;
                    let route = destination_route(destination, lang, slug)?;
                    Some(SitemapEntry {
                        loc: format!("{}/{route}", self.site_url),
                        lastmod: Some(now),
                        changefreq: ChangeFrequency::Weekly,
                        priority: 0.8,
                    })
                })
            })
            .collect()
    }

    /// Collects every entry. A collection that cannot be fetched is left out
    /// and the rest of the sitemap is still produced.
    pub async fn entries(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let (articles, companies, destinations) = tokio::join!(
            self.content.all_articles(),
            self.content.all_companies(),
            self.content.all_destinations()
        );

        for (collection, failure) in [
            ("articles", articles.failure()),
            ("companies", companies.failure()),
            ("destinations", destinations.failure()),
        ] {
            if let Some(failure) = failure {
                warn!(collection, error = %failure, "Leaving collection out of the sitemap");
            }
        }

        let mut entries = self.static_entries(now);
        entries.extend(self.article_entries(&articles.into_vec()));
        entries.extend(self.company_entries(&companies.into_vec()));
        entries.extend(self.destination_entries(&destinations.into_vec(), now));

        info!(entries = entries.len(), "Sitemap generated");
        entries
    }

    pub async fn generate(&self, now: DateTime<Utc>) -> Result<String> {
        render(&self.entries(now).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_snapshot::{ContentSnapshot, InMemoryContentService};
    use chrono::TimeZone;
    use serde_json::json;

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.org/".to_string(),
            supported_languages: vec!["it".to_string(), "en".to_string()],
            ..SiteConfig::default()
        }
    }

    fn service(snapshot: serde_json::Value) -> SitemapService {
        let snapshot: ContentSnapshot = serde_json::from_value(snapshot).unwrap();
        SitemapService::new(Arc::new(InMemoryContentService::new(snapshot)), &site())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_static_entries_per_language() {
        let entries = service(json!({})).entries(now()).await;

        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].loc, "https://example.org/it");
        assert!((entries[0].priority - 1.0).abs() < f32::EPSILON);
        assert_eq!(entries[5].loc, "https://example.org/en/magazine");
        assert_eq!(entries[7].changefreq, ChangeFrequency::Weekly);
    }

    #[tokio::test]
    async fn test_destination_routes_use_same_language_ancestors() {
        let entries = service(json!({
            "destinations": [
                {"id": 1, "type": "region", "translations": [
                    {"languages_code": "it", "slug_permalink": "toscana"},
                    {"languages_code": "en", "slug_permalink": "tuscany"}
                ]},
                {"id": 2, "type": "province", "region_id": 1, "translations": [
                    {"languages_code": "it", "slug_permalink": "siena"},
                    {"languages_code": "en", "slug_permalink": "siena-en"}
                ]},
                {"id": 3, "type": "municipality", "region_id": 1, "province_id": 2, "translations": [
                    {"languages_code": "en", "slug_permalink": "montalcino"},
                    {"languages_code": "fr", "slug_permalink": "montalcino-fr"}
                ]},
                {"id": 4, "type": "province", "region_id": 99, "translations": [
                    {"languages_code": "it", "slug_permalink": "orfana"}
                ]}
            ]
        }))
        .entries(now())
        .await;

        let locs: Vec<&str> = entries.iter().skip(8).map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.org/it/toscana",
                "https://example.org/en/tuscany",
                "https://example.org/it/toscana/siena",
                "https://example.org/en/tuscany/siena-en",
                "https://example.org/en/tuscany/siena-en/montalcino",
            ]
        );
    }

    #[tokio::test]
    async fn test_destinations_with_mismatched_parents_are_skipped() {
        let entries = service(json!({
            "destinations": [
                {"id": 1, "type": "region", "translations": [
                    {"languages_code": "it", "slug_permalink": "toscana"}
                ]},
                {"id": 2, "type": "region", "province_id": 7, "translations": [
                    {"languages_code": "it", "slug_permalink": "lazio"}
                ]},
                {"id": 3, "type": "municipality", "region_id": 1, "translations": [
                    {"languages_code": "it", "slug_permalink": "pienza"}
                ]}
            ]
        }))
        .entries(now())
        .await;

        let locs: Vec<&str> = entries.iter().skip(8).map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, vec!["https://example.org/it/toscana"]);
    }

    #[tokio::test]
    async fn test_article_and_company_entries() {
        let entries = service(json!({
            "articles": [{
                "id": 1,
                "date_created": "2024-01-01T00:00:00Z",
                "date_updated": "2024-02-01T00:00:00Z",
                "translations": [{"languages_code": "it", "slug_permalink": "carbonara"}]
            }],
            "companies": [{
                "id": 5,
                "translations": [{"languages_code": "en", "slug_permalink": "enoteca"}]
            }]
        }))
        .entries(now())
        .await;

        let article = &entries[8];
        assert_eq!(article.loc, "https://example.org/it/magazine/carbonara");
        assert_eq!(article.changefreq, ChangeFrequency::Monthly);
        assert_eq!(
            article.lastmod,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );

        let company = &entries[9];
        assert_eq!(company.loc, "https://example.org/en/companies/enoteca");
        assert_eq!(company.lastmod, None);
    }

    #[test]
    fn test_render_xml() {
        let xml = render(&[SitemapEntry {
            loc: "https://example.org/it".to_string(),
            lastmod: Some(now()),
            changefreq: ChangeFrequency::Daily,
            priority: 1.0,
        }])
        .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.org/it</loc>"));
        assert!(xml.contains("<lastmod>2025-03-01T12:00:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }
}
