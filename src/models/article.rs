use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Relation, lenient_timestamp, non_empty, null_as_default};
use crate::domain::EntityId;

/// Promotional placement tier of a magazine article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedStatus {
    #[default]
    None,
    Homepage,
    Top,
    Editor,
    Trending,
}

impl FeaturedStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Homepage => "homepage",
            Self::Top => "top",
            Self::Editor => "editor",
            Self::Trending => "trending",
        }
    }
}

impl std::str::FromStr for FeaturedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "homepage" => Ok(Self::Homepage),
            "top" => Ok(Self::Top),
            "editor" => Ok(Self::Editor),
            "trending" => Ok(Self::Trending),
            other => Err(format!("unknown featured status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleTranslation {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default, rename = "titolo_articolo")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_summary: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
}

/// Category as embedded in an article (`category.translations.nome_categoria`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleCategory {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<ArticleCategoryName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleCategoryName {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default, rename = "nome_categoria")]
    pub name: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
}

impl ArticleCategory {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(self.translations.first()?.name.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: EntityId,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured_status: FeaturedStatus,
    #[serde(default)]
    pub featured_order: Option<i32>,
    /// List queries return the raw `category_id`, detail queries expand
    /// `category`.
    #[serde(default, alias = "category_id")]
    pub category: Option<Relation<ArticleCategory>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<ArticleTranslation>,
}

impl Article {
    #[must_use]
    pub fn primary_translation(&self) -> Option<&ArticleTranslation> {
        self.translations.first()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.title.as_ref())
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.slug_permalink.as_ref())
    }

    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref()?.expanded()?.name()
    }

    /// Most recent edit, falling back to the creation date.
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.date_updated.or(self.date_created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_article() {
        let json = r#"{
            "id": 3,
            "image": "b1c2",
            "date_created": "2024-05-10T08:00:00.000Z",
            "featured_status": "trending",
            "category": {"id": 2, "translations": [{"nome_categoria": "Cucina"}]},
            "translations": [{"titolo_articolo": "Carbonara", "slug_permalink": "carbonara"}]
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.featured_status, FeaturedStatus::Trending);
        assert_eq!(article.title(), Some("Carbonara"));
        assert_eq!(article.slug(), Some("carbonara"));
        assert_eq!(article.category_name(), Some("Cucina"));
        assert_eq!(article.last_modified(), article.date_created);
    }

    #[test]
    fn test_null_featured_status_defaults_to_none() {
        let json = r#"{"id": 1, "featured_status": null, "category": 5}"#;
        let article: Article = serde_json::from_str(json).unwrap();

        assert_eq!(article.featured_status, FeaturedStatus::None);
        assert!(article.category_name().is_none());
        assert!(article.translations.is_empty());
    }

    #[test]
    fn test_list_rows_carry_raw_category_id() {
        let article: Article = serde_json::from_str(r#"{"id": 1, "category_id": 7}"#).unwrap();
        assert_eq!(article.category, Some(Relation::Id(EntityId::from(7))));
    }
}
