//! URL building and host rewriting for the configured site.

use regex_lite::Regex;

use crate::config::{ConfigError, SiteConfig};

use super::MatchKind;

/// Percent-encode `title` and append it to an endpoint prefix.
///
/// The endpoint is expected to end with the query parameter, e.g.
/// `https://host/index.php?kp_query=`. Blank titles are the caller's problem.
pub fn build_query_url(base_endpoint: &str, title: &str) -> String {
    format!("{}{}", base_endpoint, urlencoding::encode(title))
}

/// A detail link recognized in a source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    /// Absolute URL on the source host.
    pub source_url: String,
    pub kind: MatchKind,
    pub id: String,
}

/// Hosts, route segments and endpoints of the source and target sites.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    source_host: String,
    target_host: String,
    source_origin: String,
    movie_segment: String,
    series_segments: Vec<String>,
    html_search_url: String,
    api_search_url: String,
    direct_search_url: String,
    /// `^/(segment)/(digits)` against a path.
    path_pattern: Regex,
    /// `/(segment)/(digits)` anywhere in a url.
    id_pattern: Regex,
}

impl SiteProfile {
    /// Build a profile from configuration.
    pub fn new(config: &SiteConfig) -> Result<Self, ConfigError> {
        if config.movie_segment.is_empty() || config.series_segments.iter().any(|s| s.is_empty())
        {
            return Err(ConfigError::ValidationError(
                "site route segments cannot be empty".to_string(),
            ));
        }
        if !config.source_origin.contains(&config.source_host) {
            return Err(ConfigError::ValidationError(
                "site source origin must be on the source host".to_string(),
            ));
        }

        let alternation = std::iter::once(&config.movie_segment)
            .chain(config.series_segments.iter())
            .map(|s| regex_lite::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        let path_pattern = Regex::new(&format!(r"^/({})/(\d+)", alternation))
            .map_err(|e| ConfigError::ValidationError(format!("invalid route segment: {}", e)))?;
        let id_pattern = Regex::new(&format!(r"/({})/(\d+)", alternation))
            .map_err(|e| ConfigError::ValidationError(format!("invalid route segment: {}", e)))?;

        Ok(Self {
            source_host: config.source_host.clone(),
            target_host: config.target_host.clone(),
            source_origin: config.source_origin.trim_end_matches('/').to_string(),
            movie_segment: config.movie_segment.clone(),
            series_segments: config.series_segments.clone(),
            html_search_url: config.html_search_url.clone(),
            api_search_url: config.api_search_url.clone(),
            direct_search_url: config.direct_search_url.clone(),
            path_pattern,
            id_pattern,
        })
    }

    pub fn source_host(&self) -> &str {
        &self.source_host
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    pub fn html_search_url(&self) -> &str {
        &self.html_search_url
    }

    pub fn api_search_url(&self) -> &str {
        &self.api_search_url
    }

    /// Swap the source host for the target host. Other urls pass through.
    pub fn rewrite_host(&self, source_url: &str) -> String {
        source_url.replace(&self.source_host, &self.target_host)
    }

    /// Fallback search link built from the raw query only.
    pub fn direct_search_url(&self, title: &str) -> String {
        build_query_url(&self.direct_search_url, title)
    }

    /// Source-host detail page for an item.
    pub fn detail_url(&self, kind: MatchKind, id: &str) -> String {
        let segment = match kind {
            MatchKind::Movie => self.movie_segment.as_str(),
            MatchKind::Series => self
                .series_segments
                .first()
                .map(String::as_str)
                .unwrap_or(self.movie_segment.as_str()),
        };
        format!("{}/{}/{}/", self.source_origin, segment, id)
    }

    /// Numeric identifier from a detail url, if it has one.
    pub fn extract_id(&self, url: &str) -> Option<String> {
        self.id_pattern
            .captures(url)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Recognize an href pointing at a detail page.
    ///
    /// Accepts relative paths and absolute urls under the source origin.
    pub fn parse_detail_href(&self, href: &str) -> Option<DetailLink> {
        let href = href.trim();
        let path = if href.starts_with('/') && !href.starts_with("//") {
            href
        } else {
            href.strip_prefix(self.source_origin.as_str())?
        };

        let caps = self.path_pattern.captures(path)?;
        let segment = caps.get(1)?.as_str();
        let id = caps.get(2)?.as_str().to_string();

        let kind = if segment == self.movie_segment {
            MatchKind::Movie
        } else {
            MatchKind::Series
        };

        Some(DetailLink {
            source_url: format!("{}{}", self.source_origin, path),
            kind,
            id,
        })
    }
}

#[cfg(test)]
pub(crate) fn example_profile() -> SiteProfile {
    SiteProfile::new(&SiteConfig {
        source_host: "source.example".to_string(),
        target_host: "target.example".to_string(),
        source_origin: "https://source.example".to_string(),
        movie_segment: "movie-detail".to_string(),
        series_segments: vec![
            "series-detail".to_string(),
            "miniseries-detail".to_string(),
        ],
        html_search_url: "https://source.example/search?query=".to_string(),
        api_search_url: "https://api.example/search?keyword=".to_string(),
        direct_search_url: "https://target.example/search?query=".to_string(),
    })
    .unwrap()
}
