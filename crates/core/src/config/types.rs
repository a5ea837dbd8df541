use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Placeholder key used when no `KINOPOISK_API_KEY` is provided.
///
/// The upstream API rejects it, so lookups through the API source fall back
/// to the direct-search link until a real key is configured.
pub const DEMO_API_KEY: &str = "demo-api-key";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Which upstream the lookup service queries.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Keyword search API (needs an API key).
    #[default]
    Api,
    /// Scrape the HTML search results page.
    Html,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Api => "api",
            SourceKind::Html => "html",
        }
    }
}

/// Lookup service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub source: SourceKind,
    /// Upstream request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How long results stay cached, in seconds (default: 3600)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Cache lookups that succeeded but found nothing (default: true)
    #[serde(default = "default_true")]
    pub cache_empty_results: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            cache_empty_results: true,
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

/// Hosts, route segments and search endpoints of the movie database.
///
/// Endpoints are prefixes; the percent-encoded title is appended to them.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Host substring rewritten in every detail url
    pub source_host: String,
    /// Host substring it is rewritten to
    pub target_host: String,
    /// Scheme and host prepended to relative detail paths
    pub source_origin: String,
    pub movie_segment: String,
    pub series_segments: Vec<String>,
    pub html_search_url: String,
    pub api_search_url: String,
    /// Search page on the target host used for the fallback link
    pub direct_search_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_host: "kinopoisk.ru".to_string(),
            target_host: "sspoisk.ru".to_string(),
            source_origin: "https://www.kinopoisk.ru".to_string(),
            movie_segment: "film".to_string(),
            series_segments: vec!["series".to_string(), "serial".to_string()],
            html_search_url: "https://www.kinopoisk.ru/index.php?kp_query=".to_string(),
            api_search_url:
                "https://kinopoiskapiunofficial.tech/api/v2.1/films/search-by-keyword?keyword="
                    .to_string(),
            direct_search_url: "https://sspoisk.ru/index.php?kp_query=".to_string(),
        }
    }
}

/// Keyword API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

fn default_api_key() -> String {
    DEMO_API_KEY.to_string()
}

impl ApiConfig {
    /// True when a key other than the demo placeholder is set.
    pub fn has_real_key(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != DEMO_API_KEY
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub lookup: LookupConfig,
    pub site: SiteConfig,
    pub api: SanitizedApiConfig,
}

/// Sanitized API config (key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            lookup: config.lookup.clone(),
            site: config.site.clone(),
            api: SanitizedApiConfig {
                api_key_configured: config.api.has_real_key(),
            },
        }
    }
}
