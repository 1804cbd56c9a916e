use serde::Serialize;

use crate::models::{Article, Company, Destination};
use crate::services::{PageMetadata, SlugTrail};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DestinationDetail {
    pub destination: Destination,
    /// Absent when the destination has no translation in the requested language
    pub trail: Option<SlugTrail>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub article: Article,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    pub company: Company,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub items: Vec<Article>,
    pub total: u64,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_secs: u64,
    pub content_source: ContentSource,
    pub cms_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cms_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Cms,
    Snapshot,
}
