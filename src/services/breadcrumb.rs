//! Breadcrumb and slug resolution for destination pages.

use crate::domain::EntityId;
use crate::models::{Destination, DestinationSummary, DestinationType};
use crate::services::content_service::{ContentService, Fetch};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

/// Localized route segments of a destination and its breadcrumb.
///
/// Segments that do not apply to the destination level are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlugTrail {
    pub region_slug: String,
    pub province_slug: String,
    pub municipality_slug: String,
    pub breadcrumb: Vec<Crumb>,
}

fn parent_slug(parent: Option<&DestinationSummary>) -> String {
    parent
        .and_then(DestinationSummary::slug)
        .unwrap_or_default()
        .to_string()
}

/// Builds the trail from a destination fetched with its ancestors.
///
/// Returns `None` when the destination has no translation in `lang`. Missing
/// ancestor slugs become empty segments rather than failing the trail.
#[must_use]
pub fn build_trail(destination: &Destination, lang: &str) -> Option<SlugTrail> {
    if !destination.is_translated() {
        return None;
    }
    let current = destination.slug().unwrap_or_default().to_string();

    let (region_slug, province_slug, municipality_slug) = match destination.kind {
        DestinationType::Region => (current, String::new(), String::new()),
        DestinationType::Province => (parent_slug(destination.region()), current, String::new()),
        DestinationType::Municipality => (
            parent_slug(destination.region()),
            parent_slug(destination.province()),
            current,
        ),
    };

    let segments = [&region_slug, &province_slug, &municipality_slug];
    let mut breadcrumb = Vec::with_capacity(destination.kind.depth());
    let mut path = format!("/{lang}");
    for segment in segments.into_iter().take(destination.kind.depth()) {
        path = format!("{path}/{segment}");
        breadcrumb.push(Crumb {
            label: segment.clone(),
            path: path.clone(),
        });
    }

    Some(SlugTrail {
        region_slug,
        province_slug,
        municipality_slug,
        breadcrumb,
    })
}

pub struct BreadcrumbService {
    content: Arc<dyn ContentService>,
}

impl BreadcrumbService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentService>) -> Self {
        Self { content }
    }

    pub async fn resolve(&self, id: &EntityId, lang: &str) -> Fetch<SlugTrail> {
        match self.content.destination_by_id(id, lang).await {
            Fetch::Found(destination) => {
                let trail = build_trail(&destination, lang);
                if trail.is_none() {
                    warn!(%id, lang, "Destination has no translation for breadcrumb");
                }
                Fetch::from_option(trail)
            }
            Fetch::Empty => Fetch::Empty,
            Fetch::Failed(failure) => Fetch::Failed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn destination(value: serde_json::Value) -> Destination {
        serde_json::from_value(value).unwrap()
    }

    fn crumbs(trail: &SlugTrail) -> Vec<(&str, &str)> {
        trail
            .breadcrumb
            .iter()
            .map(|c| (c.label.as_str(), c.path.as_str()))
            .collect()
    }

    #[test]
    fn test_region_trail() {
        let trail = build_trail(
            &destination(json!({
                "id": 1,
                "type": "region",
                "translations": [{"slug_permalink": "toscana"}]
            })),
            "it",
        )
        .unwrap();

        assert_eq!(trail.region_slug, "toscana");
        assert_eq!(trail.province_slug, "");
        assert_eq!(crumbs(&trail), vec![("toscana", "/it/toscana")]);
    }

    #[test]
    fn test_province_trail() {
        let trail = build_trail(
            &destination(json!({
                "id": 2,
                "type": "province",
                "region_id": {"translations": [{"slug_permalink": "toscana"}]},
                "translations": [{"slug_permalink": "siena"}]
            })),
            "it",
        )
        .unwrap();

        assert_eq!(
            crumbs(&trail),
            vec![("toscana", "/it/toscana"), ("siena", "/it/toscana/siena")]
        );
    }

    #[test]
    fn test_municipality_trail() {
        let trail = build_trail(
            &destination(json!({
                "id": 3,
                "type": "municipality",
                "region_id": {"translations": [{"slug_permalink": "toscana"}]},
                "province_id": {"translations": [{"slug_permalink": "siena"}]},
                "translations": [{"slug_permalink": "montalcino"}]
            })),
            "en",
        )
        .unwrap();

        assert_eq!(trail.municipality_slug, "montalcino");
        assert_eq!(trail.breadcrumb.len(), 3);
        assert_eq!(trail.breadcrumb[2].path, "/en/toscana/siena/montalcino");
    }

    #[test]
    fn test_missing_province_translation_leaves_empty_segment() {
        let trail = build_trail(
            &destination(json!({
                "id": 3,
                "type": "municipality",
                "region_id": {"translations": [{"slug_permalink": "toscana"}]},
                "province_id": {"translations": []},
                "translations": [{"slug_permalink": "montalcino"}]
            })),
            "it",
        )
        .unwrap();

        assert_eq!(trail.province_slug, "");
        assert_eq!(
            crumbs(&trail),
            vec![
                ("toscana", "/it/toscana"),
                ("", "/it/toscana/"),
                ("montalcino", "/it/toscana//montalcino"),
            ]
        );
    }

    #[test]
    fn test_untranslated_destination_has_no_trail() {
        let bare = destination(json!({"id": 1, "type": "region", "translations": []}));
        assert!(build_trail(&bare, "it").is_none());
    }
}
