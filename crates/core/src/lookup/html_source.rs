//! Search results page scraper.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use super::urls::{build_query_url, SiteProfile};
use super::{extract_html, MatchRecord, RawResponse, ResultSource, SourceError};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Scrapes the source site's HTML search page.
pub struct HtmlSearchSource {
    client: Client,
    profile: SiteProfile,
}

impl HtmlSearchSource {
    /// Create a scraper with browser-like default headers.
    pub fn new(profile: SiteProfile, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()?;

        Ok(Self { client, profile })
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5,en;q=0.3"),
    );
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}

#[async_trait]
impl ResultSource for HtmlSearchSource {
    fn name(&self) -> &str {
        "html"
    }

    async fn fetch(&self, title: &str) -> Result<RawResponse, SourceError> {
        let url = build_query_url(self.profile.html_search_url(), title);
        debug!(url = %url, "Fetching search page");

        let response = self
            .client
            .get(&url)
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
        Ok(extract_html(&self.profile, &raw.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use axum::{extract::Query, http::HeaderMap as AxumHeaders, routing::get, Router};
    use std::collections::HashMap;

    /// Serve a fake search page on a random local port and return its base url.
    async fn spawn_search_page(status: u16) -> String {
        let app = Router::new().route(
            "/index.php",
            get(move |Query(params): Query<HashMap<String, String>>, headers: AxumHeaders| async move {
                let query = params.get("kp_query").cloned().unwrap_or_default();
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let body = format!(
                    r#"<html><body>
                        <p class="name"><a href="/film/301/">{}</a></p>
                        <p class="agent">{}</p>
                    </body></html>"#,
                    query, agent
                );
                (
                    axum::http::StatusCode::from_u16(status).unwrap(),
                    axum::response::Html(body),
                )
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn local_profile(base: &str) -> SiteProfile {
        SiteProfile::new(&SiteConfig {
            source_host: "127.0.0.1".to_string(),
            target_host: "mirror.example".to_string(),
            source_origin: base.to_string(),
            html_search_url: format!("{}/index.php?kp_query=", base),
            ..SiteConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_and_extract() {
        let base = spawn_search_page(200).await;
        let source = HtmlSearchSource::new(local_profile(&base), Duration::from_secs(5)).unwrap();

        let raw = source.fetch("The Matrix").await.unwrap();
        assert!(raw.url.ends_with("kp_query=The%20Matrix"));
        assert!(raw.body.contains("Mozilla/5.0"));

        let records = source.extract(&raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "The Matrix");
        assert!(records[0].url.contains("mirror.example"));
        assert!(records[0].url.ends_with("/film/301/"));
        assert_eq!(records[0].id.as_deref(), Some("301"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let base = spawn_search_page(503).await;
        let source = HtmlSearchSource::new(local_profile(&base), Duration::from_secs(5)).unwrap();

        let err = source.fetch("Matrix").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let source = HtmlSearchSource::new(local_profile(&base), Duration::from_secs(5)).unwrap();
        assert!(source.fetch("Matrix").await.is_err());
    }
}
