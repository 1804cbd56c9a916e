use super::ApiError;
use crate::config::SiteConfig;
use crate::domain::{EntityId, LanguageCode};
use crate::models::{DestinationType, FeaturedStatus};

pub fn validate_language(site: &SiteConfig, lang: &str) -> Result<String, ApiError> {
    let code = LanguageCode::parse(lang)
        .ok_or_else(|| ApiError::validation(format!("Invalid language code: {lang}")))?;

    if !site.supports(code.as_str()) {
        return Err(ApiError::validation(format!(
            "Unsupported language: {code}. Supported languages are {}",
            site.supported_languages.join(", ")
        )));
    }
    Ok(code.to_string())
}

pub fn validate_limit(limit: u32) -> Result<u32, ApiError> {
    const MAX_LIMIT: u32 = 100;
    const MIN_LIMIT: u32 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

pub fn validate_destination_type(kind: Option<&str>) -> Result<Option<DestinationType>, ApiError> {
    kind.filter(|k| !k.trim().is_empty())
        .map(|k| {
            k.trim().parse().map_err(|_| {
                ApiError::validation(format!(
                    "Invalid destination type: {k}. Expected region, province or municipality"
                ))
            })
        })
        .transpose()
}

pub fn validate_featured_status(status: Option<&str>) -> Result<Option<FeaturedStatus>, ApiError> {
    status
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .map_err(|_| ApiError::validation(format!("Invalid featured status: {s}")))
        })
        .transpose()
}

pub fn validate_id(id: Option<&str>) -> Option<EntityId> {
    id.map(str::trim).filter(|id| !id.is_empty()).map(EntityId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            supported_languages: vec!["it".to_string(), "en".to_string()],
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_validate_language() {
        assert_eq!(validate_language(&site(), "it").unwrap(), "it");
        assert!(validate_language(&site(), "fr").is_err());
        assert!(validate_language(&site(), "").is_err());
        assert!(validate_language(&site(), "it/../en").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(100).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(101).is_err());
    }

    #[test]
    fn test_validate_destination_type() {
        assert_eq!(
            validate_destination_type(Some("province")).unwrap(),
            Some(DestinationType::Province)
        );
        assert_eq!(validate_destination_type(None).unwrap(), None);
        assert_eq!(validate_destination_type(Some(" ")).unwrap(), None);
        assert!(validate_destination_type(Some("country")).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(Some(" 12 ")), Some(EntityId::from("12")));
        assert_eq!(validate_id(Some("")), None);
        assert_eq!(validate_id(None), None);
    }
}
