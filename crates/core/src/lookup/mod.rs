//! Title lookup against an external movie database.
//!
//! This module provides a `ResultSource` trait for fetching and extracting
//! matches from an upstream site (HTML search page or keyword API), a TTL
//! cache in front of it, and the `LookupService` tying them together with a
//! direct-search fallback.

mod api_source;
mod cache;
mod dedup;
mod html;
mod html_source;
mod json;
mod service;
mod types;
mod urls;

pub use api_source::KeywordApiSource;
pub use cache::{CacheStats, LookupCache, DEFAULT_CACHE_TTL};
pub use dedup::deduplicate_by_url;
pub use html::extract_html;
pub use html_source::HtmlSearchSource;
pub use json::extract_json;
pub use service::{LookupService, DEFAULT_LOOKUP_TIMEOUT};
pub use types::*;
pub use urls::{build_query_url, DetailLink, SiteProfile};

#[cfg(test)]
pub(crate) use urls::example_profile;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ConfigError, SourceKind};

/// Create the configured result source.
pub fn create_source(
    config: &Config,
    profile: SiteProfile,
) -> Result<Arc<dyn ResultSource>, SourceError> {
    let timeout = Duration::from_secs(config.lookup.timeout_secs);

    match config.lookup.source {
        SourceKind::Api => {
            if !config.api.has_real_key() {
                warn!("No API key configured, using the demo placeholder");
            }
            Ok(Arc::new(KeywordApiSource::new(
                profile,
                config.api.api_key.clone(),
                timeout,
            )?))
        }
        SourceKind::Html => Ok(Arc::new(HtmlSearchSource::new(profile, timeout)?)),
    }
}

/// Build a lookup service from configuration.
pub fn create_lookup_service(config: &Config) -> Result<LookupService, ConfigError> {
    let profile = SiteProfile::new(&config.site)?;
    let source = create_source(config, profile.clone())
        .map_err(|e| ConfigError::ValidationError(format!("cannot create source: {}", e)))?;

    info!(
        source = source.name(),
        timeout_secs = config.lookup.timeout_secs,
        cache_ttl_secs = config.lookup.cache_ttl_secs,
        "Lookup service configured"
    );

    Ok(LookupService::new(source, profile)
        .with_timeout(Duration::from_secs(config.lookup.timeout_secs))
        .with_cache(LookupCache::new(Duration::from_secs(
            config.lookup.cache_ttl_secs,
        )))
        .with_cache_empty_results(config.lookup.cache_empty_results))
}

/// Errors from looking up a title.
///
/// Only invalid input reaches the caller; upstream trouble is absorbed by the
/// direct-search fallback.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The query was empty or whitespace.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from an upstream result source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the upstream host.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body could not be interpreted.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl SourceError {
    /// Map a reqwest error onto the more specific variants.
    pub fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if e.is_connect() {
            SourceError::ConnectionFailed(e.to_string())
        } else {
            SourceError::Http(e)
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Timeout => "timeout",
            SourceError::ConnectionFailed(_) => "connection",
            SourceError::Http(_) => "http",
            SourceError::Status { .. } => "status",
            SourceError::InvalidPayload(_) => "payload",
        }
    }
}

/// An upstream that can be searched by title.
///
/// Fetching and extraction are split so the service can tell a failed call
/// apart from a call that found nothing.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Short name for logs and metrics.
    fn name(&self) -> &str;

    /// Perform the outbound search request for `title`.
    async fn fetch(&self, title: &str) -> Result<RawResponse, SourceError>;

    /// Turn a successful response into matches.
    fn extract(&self, raw: &RawResponse) -> Result<Vec<MatchRecord>, SourceError>;
}
