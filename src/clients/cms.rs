//! HTTP client for the Directus REST API.

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::query::Query;
use crate::config::CmsConfig;
use crate::models::null_as_default;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Invalid CMS URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("CMS unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CMS responded with status {status}")]
    Status { status: u16 },

    #[error("Malformed CMS payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The `{ data, meta }` wrapper around every items response.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.meta.as_ref()?.total_count
    }
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct CmsClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        // Without the trailing slash `Url::join` would replace the last path
        // segment of installations mounted under a prefix.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        let token = Some(config.token.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs an items query and decodes the envelope.
    pub async fn fetch<T: DeserializeOwned>(&self, query: &Query) -> Result<Envelope<T>, CmsError> {
        let mut url = self.base_url.join(&query.path())?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_query_pairs() {
                pairs.append_pair(&key, &value);
            }
        }

        debug!(collection = query.collection(), "Fetching from CMS");

        let body = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches the user the bearer token belongs to. Succeeds only when the
    /// token is accepted.
    pub async fn current_user(&self) -> Result<Option<serde_json::Value>, CmsError> {
        let url = self.base_url.join("users/me")?;
        let body = self.get_bytes(url).await?;
        let user: CurrentUser = serde_json::from_slice(&body)?;
        Ok(user.data)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, CmsError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_meta() {
        let json = r#"{"data": [{"id": 1}, {"id": 2}], "meta": {"total_count": 42}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.total_count(), Some(42));
    }

    #[test]
    fn test_envelope_null_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.total_count(), None);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = CmsConfig {
            base_url: "https://cms.example.org/directus".to_string(),
            ..CmsConfig::default()
        };
        let client = CmsClient::new(&config).unwrap();

        assert_eq!(client.base_url().as_str(), "https://cms.example.org/directus/");
        assert_eq!(
            client.base_url().join("items/articles").unwrap().as_str(),
            "https://cms.example.org/directus/items/articles"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = CmsConfig {
            base_url: "not a url".to_string(),
            ..CmsConfig::default()
        };
        assert!(matches!(CmsClient::new(&config), Err(CmsError::InvalidUrl(_))));
    }
}
