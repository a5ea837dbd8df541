//! Keyword search API client.
//!
//! The API needs a key sent in the `X-API-KEY` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::urls::{build_query_url, SiteProfile};
use super::{extract_json, MatchRecord, RawResponse, ResultSource, SourceError};

/// Searches films through the keyword search API.
pub struct KeywordApiSource {
    client: Client,
    profile: SiteProfile,
    api_key: String,
}

impl KeywordApiSource {
    /// Create a new API client.
    pub fn new(
        profile: SiteProfile,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            profile,
            api_key: api_key.into(),
        })
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }
}

#[async_trait]
impl ResultSource for KeywordApiSource {
    fn name(&self) -> &str {
        "api"
    }

    async fn fetch(&self, title: &str) -> Result<RawResponse, SourceError> {
        let url = build_query_url(self.profile.api_search_url(), title);
        debug!(url = %url, "Keyword API search");

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(SourceError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await.map_err(SourceError::from_request)?;
        Ok(RawResponse { url, body })
    }

    fn extract(&self, raw: &RawResponse) -> Result<Vec<MatchRecord>, SourceError> {
        extract_json(&self.profile, &raw.body)
    }
}
