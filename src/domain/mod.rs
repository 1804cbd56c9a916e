//! Domain primitives shared by the content models, services and API.
//!
//! Newtypes keep CMS identifiers and language codes from being mixed up with
//! slugs or free text as they travel between layers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Identifier of a CMS record.
///
/// Directus collections use either integer or UUID primary keys, so the id is
/// kept in its textual form and accepts both JSON numbers and strings.
///
/// # Examples
///
/// ```rust
/// use belpaese::domain::EntityId;
///
/// let id: EntityId = serde_json::from_str("42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// assert_eq!(id, EntityId::new("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(id) => Ok(Self::from(id)),
            RawId::Text(id) => Ok(Self(id)),
        }
    }
}

/// A language code as used in the `languages_code` column of the CMS
/// (`it`, `en`, `zh-tw`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parses and normalizes a language code to lower case.
    ///
    /// Returns `None` for anything that is not a two or three letter code with
    /// an optional region suffix.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[a-z0-9]{2,4})?$").ok())
            .as_ref()?;

        let normalized = code.trim().to_lowercase();
        pattern.is_match(&normalized).then_some(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid language code: {value}"))
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_accepts_numbers_and_strings() {
        let numeric: EntityId = serde_json::from_str("17").unwrap();
        let textual: EntityId = serde_json::from_str("\"9b1d-44\"").unwrap();

        assert_eq!(numeric.as_str(), "17");
        assert_eq!(textual.as_str(), "9b1d-44");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"17\"");
    }

    #[test]
    fn test_entity_id_rejects_objects() {
        let parsed: Result<EntityId, _> = serde_json::from_str(r#"{"id": 1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_language_code_parse() {
        assert_eq!(LanguageCode::parse("IT").unwrap().as_str(), "it");
        assert_eq!(LanguageCode::parse("zh-tw").unwrap().as_str(), "zh-tw");
        assert!(LanguageCode::parse("").is_none());
        assert!(LanguageCode::parse("italian").is_none());
        assert!(LanguageCode::parse("../etc").is_none());
    }
}
