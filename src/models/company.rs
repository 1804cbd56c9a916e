use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::{lenient_timestamp, non_empty, null_as_default};
use crate::domain::EntityId;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl<'de> Deserialize<'de> for GeoPoint {
    /// Accepts both `{lat, lng}` objects and GeoJSON points, whose
    /// coordinates are ordered longitude first.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPoint {
            LatLng { lat: f64, lng: f64 },
            GeoJson { coordinates: [f64; 2] },
        }

        Ok(match RawPoint::deserialize(deserializer)? {
            RawPoint::LatLng { lat, lng } => Self { lat, lng },
            RawPoint::GeoJson {
                coordinates: [lng, lat],
            } => Self { lat, lng },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyTranslation {
    #[serde(default)]
    pub languages_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug_permalink: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub seo_summary: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A business listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub socials: BTreeMap<String, String>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub location_id: Option<EntityId>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: Vec<CompanyTranslation>,
}

const fn default_true() -> bool {
    true
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

impl Company {
    #[must_use]
    pub fn primary_translation(&self) -> Option<&CompanyTranslation> {
        self.translations.first()
    }

    /// Localized name, falling back to the untranslated company name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.primary_translation()
            .and_then(|t| non_empty(t.name.as_ref()))
            .or_else(|| non_empty(self.company_name.as_ref()))
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        non_empty(self.primary_translation()?.slug_permalink.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_formats() {
        let plain: GeoPoint = serde_json::from_str(r#"{"lat": 41.9, "lng": 12.5}"#).unwrap();
        let geojson: GeoPoint =
            serde_json::from_str(r#"{"type": "Point", "coordinates": [12.5, 41.9]}"#).unwrap();

        assert_eq!(plain, geojson);
    }

    #[test]
    fn test_company_defaults() {
        let json = r#"{
            "id": 9,
            "company_name": "Trattoria Da Enzo",
            "socials": null,
            "active": null,
            "translations": [{"slug_permalink": "da-enzo", "address": "Via dei Vascellari 29"}]
        }"#;

        let company: Company = serde_json::from_str(json).unwrap();
        assert!(company.active);
        assert!(!company.featured);
        assert!(company.socials.is_empty());
        assert_eq!(company.display_name(), Some("Trattoria Da Enzo"));
        assert_eq!(company.slug(), Some("da-enzo"));
    }
}
