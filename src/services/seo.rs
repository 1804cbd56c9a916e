//! Page metadata for search engines and social previews.

use crate::config::{CmsConfig, SiteConfig};
use crate::models::{Article, Company, Destination};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenGraphType {
    Website,
    Article,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraphImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraphArticle {
    pub published_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OpenGraphType,
    pub url: String,
    pub site_name: String,
    pub images: Vec<OpenGraphImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<OpenGraphArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    /// schema.org JSON-LD, when the page has a matching type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<serde_json::Value>,
}

fn first_present<'a>(candidates: &[Option<&'a String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct SeoBuilder {
    site_url: String,
    site_name: String,
    assets_url: String,
    default_image: String,
}

impl SeoBuilder {
    #[must_use]
    pub fn new(site: &SiteConfig, cms: &CmsConfig) -> Self {
        let site_url = site.root_url().to_string();
        let default_image = site
            .default_image
            .clone()
            .unwrap_or_else(|| format!("{site_url}/images/default-og.jpg"));

        Self {
            assets_url: format!("{}/assets", cms.base_url.trim_end_matches('/')),
            site_name: site.name.clone(),
            default_image,
            site_url,
        }
    }

    /// Public URL of a CMS file.
    #[must_use]
    pub fn asset_url(&self, file_id: &str) -> String {
        format!("{}/{file_id}", self.assets_url)
    }

    fn page(
        &self,
        title: &str,
        description: &str,
        path: &str,
        image: Option<&String>,
        kind: OpenGraphType,
    ) -> PageMetadata {
        let url = format!("{}{path}", self.site_url);
        let image = first_present(&[image]).map_or_else(
            || self.default_image.clone(),
            |file_id| self.asset_url(file_id),
        );

        PageMetadata {
            title: title.to_string(),
            description: description.to_string(),
            canonical: url.clone(),
            open_graph: OpenGraph {
                title: title.to_string(),
                description: description.to_string(),
                kind,
                url,
                site_name: self.site_name.clone(),
                images: vec![OpenGraphImage {
                    url: image.clone(),
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                    alt: title.to_string(),
                }],
                article: None,
            },
            twitter: TwitterCard {
                card: "summary_large_image",
                title: title.to_string(),
                description: description.to_string(),
                images: vec![image],
            },
            structured_data: None,
        }
    }

    /// Metadata of a destination page served at `path`.
    #[must_use]
    pub fn for_destination(&self, destination: &Destination, path: &str) -> PageMetadata {
        let translation = destination.primary_translation();
        let title = first_present(&[
            translation.and_then(|t| t.seo_title.as_ref()),
            translation.and_then(|t| t.destination_name.as_ref()),
        ])
        .unwrap_or(self.site_name.as_str());
        let description = first_present(&[
            translation.and_then(|t| t.seo_summary.as_ref()),
            translation.and_then(|t| t.description.as_ref()),
        ])
        .unwrap_or_default();

        self.page(
            title,
            description,
            path,
            destination.image.as_ref(),
            OpenGraphType::Website,
        )
    }

    #[must_use]
    pub fn for_article(&self, article: &Article, lang: &str) -> PageMetadata {
        let translation = article.primary_translation();
        let title = first_present(&[
            translation.and_then(|t| t.seo_title.as_ref()),
            translation.and_then(|t| t.title.as_ref()),
        ])
        .unwrap_or("Article");
        let description = first_present(&[translation.and_then(|t| t.seo_summary.as_ref())])
            .unwrap_or("Read our latest article");
        let path = format!("/{lang}/magazine/{}", article.slug().unwrap_or_default());

        let mut metadata = self.page(
            title,
            description,
            &path,
            article.image.as_ref(),
            OpenGraphType::Article,
        );

        let modified = article.last_modified();
        metadata.open_graph.article = Some(OpenGraphArticle {
            published_time: article.date_created,
            modified_time: article.date_updated,
            section: article.category_name().unwrap_or("General").to_string(),
        });
        metadata.structured_data = Some(json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": article.title().unwrap_or_default(),
            "description": description,
            "datePublished": article.date_created,
            "dateModified": modified,
            "image": metadata.open_graph.images.first().map(|image| image.url.clone()),
            "url": metadata.canonical,
        }));

        metadata
    }

    #[must_use]
    pub fn for_company(&self, company: &Company, lang: &str) -> PageMetadata {
        let translation = company.primary_translation();
        let title = first_present(&[translation.and_then(|t| t.seo_title.as_ref())])
            .or_else(|| company.display_name())
            .unwrap_or(self.site_name.as_str());
        let description = first_present(&[
            translation.and_then(|t| t.seo_description.as_ref()),
            translation.and_then(|t| t.seo_summary.as_ref()),
        ])
        .unwrap_or_default();
        let path = format!("/{lang}/companies/{}", company.slug().unwrap_or_default());

        let image = company.featured_image.as_ref().or(company.logo.as_ref());
        self.page(title, description, &path, image, OpenGraphType::Website)
    }
}
