//! Content records as the CMS returns them.
//!
//! Field selection on the CMS side is partial, so almost every field is
//! optional and missing collections deserialize to empty.

pub mod article;
pub mod category;
pub mod company;
pub mod destination;

pub use article::{Article, ArticleCategory, ArticleTranslation, FeaturedStatus};
pub use category::{Category, CategoryTranslation, CompanyCategory, CompanyCategoryTranslation};
pub use company::{Company, CompanyTranslation, GeoPoint};
pub use destination::{Destination, DestinationSummary, DestinationType, Translation};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::EntityId;

/// A many-to-one relation field. Depending on the requested fields the CMS
/// returns either the bare foreign key or the expanded related record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Id(EntityId),
    Expanded(Box<T>),
}

impl<T> Relation<T> {
    /// The expanded record, if the relation was expanded.
    #[must_use]
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Expanded(record) => Some(record),
        }
    }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses CMS timestamps.
///
/// Directus emits RFC 3339 for `timestamp` fields but naive date-times for
/// `datetime` fields; naive values are taken as UTC. Unparseable values are
/// dropped instead of failing the whole payload.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| naive.and_utc()))
}

/// Returns the string when it is present and not blank.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
