use serde::{Deserialize, Serialize};

use super::{non_empty, null_as_default};
use crate::domain::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default, rename = "nome_categoria")]
    pub name: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_summary: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
}

/// Magazine category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    #[serde(default, rename = "nome_categoria")]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<CategoryTranslation>,
}

impl Category {
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        non_empty(self.translations.first()?.slug_permalink.as_ref())
    }

    #[must_use]
    pub fn slug_matches(&self, slug: &str) -> bool {
        self.translations
            .iter()
            .any(|t| t.slug_permalink.as_deref() == Some(slug))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyCategoryTranslation {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Category of the business directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyCategory {
    pub id: EntityId,
    #[serde(default)]
    pub sort: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<CompanyCategoryTranslation>,
}
