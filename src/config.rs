use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variables that override the file configuration. A `.env` file
/// in the working directory is honoured as well.
const ENV_CMS_URL: &str = "BELPAESE_CMS_URL";
const ENV_CMS_TOKEN: &str = "BELPAESE_CMS_TOKEN";
const ENV_SITE_URL: &str = "BELPAESE_SITE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub cms: CmsConfig,

    pub site: SiteConfig,

    pub search: SearchConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Base URL of the Directus instance, e.g. `http://127.0.0.1:8055`
    pub base_url: String,

    /// Static bearer token sent with every request
    pub token: String,

    /// Request timeout in seconds (default: 15)
    pub timeout_seconds: u64,

    pub user_agent: String,

    /// Serve content from a JSON snapshot instead of the CMS
    pub snapshot_path: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8055".to_string(),
            token: String::new(),
            timeout_seconds: 15,
            user_agent: format!("Belpaese/{}", env!("CARGO_PKG_VERSION")),
            snapshot_path: None,
        }
    }
}

pub const DEFAULT_LANGUAGES: [&str; 50] = [
    "it", "en", "fr", "es", "pt", "de", "tk", "hu", "ro", "nl", "sv", "pl", "vi", "id", "el", "uk",
    "ru", "bn", "zh", "hi", "ar", "fa", "ur", "ja", "ko", "am", "cs", "da", "fi", "af", "hr", "bg",
    "sk", "sl", "sr", "th", "ms", "tl", "he", "ca", "et", "lv", "lt", "mk", "az", "ka", "hy", "is",
    "sw", "zh-tw",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL of the website, used for sitemap and canonical links
    pub base_url: String,

    pub name: String,

    pub default_language: String,

    pub supported_languages: Vec<String>,

    /// Open Graph image used when a page has none
    pub default_image: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://thebestitaly.eu".to_string(),
            name: "TheBestItaly".to_string(),
            default_language: "it".to_string(),
            supported_languages: DEFAULT_LANGUAGES.iter().map(ToString::to_string).collect(),
            default_image: None,
        }
    }
}

impl SiteConfig {
    #[must_use]
    pub fn supports(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    /// Site URL without a trailing slash.
    #[must_use]
    pub fn root_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum candidates fetched per collection before scoring
    pub candidate_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 6790,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `.env` and process environment overrides on top of the file.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        if let Err(e) = tolerate_missing_dotenv(dotenvy::dotenv()) {
            warn!(error = %e, "Ignoring unreadable .env file");
        }
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_CMS_URL).filter(|v| !v.is_empty()) {
            self.cms.base_url = url;
        }
        if let Some(token) = lookup(ENV_CMS_TOKEN) {
            self.cms.token = token;
        }
        if let Some(url) = lookup(ENV_SITE_URL).filter(|v| !v.is_empty()) {
            self.site.base_url = url;
        }
        self
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("belpaese").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".belpaese").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cms.snapshot_path.is_none() {
            if self.cms.base_url.trim().is_empty() {
                anyhow::bail!("CMS base URL cannot be empty unless a snapshot is configured");
            }
            url::Url::parse(&self.cms.base_url)
                .with_context(|| format!("Invalid CMS base URL: {}", self.cms.base_url))?;
        }

        url::Url::parse(&self.site.base_url)
            .with_context(|| format!("Invalid site URL: {}", self.site.base_url))?;

        if self.site.supported_languages.is_empty() {
            anyhow::bail!("At least one supported language is required");
        }

        if let Some(code) = self
            .site
            .supported_languages
            .iter()
            .find(|code| crate::domain::LanguageCode::parse(code).is_none())
        {
            anyhow::bail!("Invalid language code in supported_languages: {code}");
        }

        if !self.site.supports(&self.site.default_language) {
            anyhow::bail!(
                "Default language '{}' is not among the supported languages",
                self.site.default_language
            );
        }

        if self.search.candidate_limit == 0 {
            anyhow::bail!("Search candidate limit must be > 0");
        }

        Ok(())
    }
}

/// A missing `.env` file is the normal case; any other failure is returned.
fn tolerate_missing_dotenv(
    loaded: std::result::Result<PathBuf, dotenvy::Error>,
) -> std::result::Result<(), dotenvy::Error> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}
