use serde::{Deserialize, Serialize};

use super::{Relation, non_empty, null_as_default};
use crate::domain::EntityId;

/// Level of a destination in the region → province → municipality tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    Region,
    Province,
    Municipality,
}

impl DestinationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Province => "province",
            Self::Municipality => "municipality",
        }
    }

    /// Number of levels from the root region down to this one.
    #[must_use]
    pub const fn depth(self) -> usize {
        match self {
            Self::Region => 1,
            Self::Province => 2,
            Self::Municipality => 3,
        }
    }
}

impl std::str::FromStr for DestinationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "province" => Ok(Self::Province),
            "municipality" => Ok(Self::Municipality),
            other => Err(format!("unknown destination type: {other}")),
        }
    }
}

impl std::fmt::Display for DestinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One language variant of a destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_summary: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub region_id: Option<Relation<DestinationSummary>>,
    #[serde(default)]
    pub province_id: Option<Relation<DestinationSummary>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<Translation>,
}

/// An ancestor destination expanded inside a relation field. Only the fields
/// that were explicitly requested are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationSummary {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default, rename = "type")]
    pub kind: Option<DestinationType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<Translation>,
}

impl DestinationSummary {
    #[must_use]
    pub fn primary_translation(&self) -> Option<&Translation> {
        self.translations.first()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.destination_name.as_ref())
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.slug_permalink.as_ref())
    }

    /// Slug of the translation in `lang`, regardless of ordering.
    #[must_use]
    pub fn slug_in(&self, lang: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.languages_code.as_deref() == Some(lang))
            .and_then(|t| non_empty(t.slug_permalink.as_ref()))
    }
}

impl Destination {
    /// The translation everything is scored and linked against: the first one
    /// the CMS returned for the requested language.
    #[must_use]
    pub fn primary_translation(&self) -> Option<&Translation> {
        self.translations.first()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.destination_name.as_ref())
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.slug_permalink.as_ref())
    }

    #[must_use]
    pub fn region(&self) -> Option<&DestinationSummary> {
        self.region_id.as_ref()?.expanded()
    }

    #[must_use]
    pub fn province(&self) -> Option<&DestinationSummary> {
        self.province_id.as_ref()?.expanded()
    }

    #[must_use]
    pub fn is_translated(&self) -> bool {
        !self.translations.is_empty()
    }

    /// Whether the parent references match the destination level: regions
    /// have no parents, provinces a region, municipalities both.
    #[must_use]
    pub const fn has_consistent_ancestry(&self) -> bool {
        let has_region = self.region_id.is_some();
        let has_province = self.province_id.is_some();
        match self.kind {
            DestinationType::Region => !has_region && !has_province,
            DestinationType::Province => has_region,
            DestinationType::Municipality => has_region && has_province,
        }
    }
}
