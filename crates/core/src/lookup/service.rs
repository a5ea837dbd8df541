//! Lookup service: cache, one upstream call, direct-search fallback.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::metrics::{LOOKUPS_TOTAL, LOOKUP_RESULTS, UPSTREAM_DURATION, UPSTREAM_REQUESTS};

use super::{
    LookupCache, LookupError, LookupOrigin, LookupOutcome, LookupResult, MatchRecord,
    ResultSource, SiteProfile, SourceError,
};

/// Default bound on a single upstream call.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up titles through a `ResultSource`, with caching and fallback.
///
/// For any non-blank title the answer is never empty: when the upstream fails
/// or finds nothing, a single direct-search record is returned instead.
pub struct LookupService {
    source: Arc<dyn ResultSource>,
    profile: SiteProfile,
    cache: LookupCache,
    timeout: Duration,
    cache_empty_results: bool,
}

impl LookupService {
    /// Create a service with the default cache TTL and timeout.
    pub fn new(source: Arc<dyn ResultSource>, profile: SiteProfile) -> Self {
        Self {
            source,
            profile,
            cache: LookupCache::default(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            cache_empty_results: true,
        }
    }

    /// Use the given cache.
    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = cache;
        self
    }

    /// Bound each upstream call to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a successful lookup with no matches is remembered for the TTL.
    pub fn with_cache_empty_results(mut self, enabled: bool) -> Self {
        self.cache_empty_results = enabled;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Look up `title`, returning matches or the direct-search fallback.
    pub async fn lookup(&self, title: &str) -> Result<LookupResult, LookupError> {
        Ok(self.lookup_detailed(title).await?.result)
    }

    /// Like [`lookup`](Self::lookup), also reporting where the answer came from.
    pub async fn lookup_detailed(&self, title: &str) -> Result<LookupOutcome, LookupError> {
        if title.trim().is_empty() {
            return Err(LookupError::InvalidInput(
                "movie title must not be empty".to_string(),
            ));
        }

        let key = LookupCache::normalize_key(title);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(query = title, "Lookup cache hit");
            if !cached.is_empty() {
                return Ok(self.finish(cached, LookupOrigin::Cache));
            }
            return Ok(self.fallback(title));
        }

        match self.fetch_and_extract(title).await {
            Ok(result) => {
                if !result.is_empty() || self.cache_empty_results {
                    self.cache.put(&key, result.clone()).await;
                }
                if result.is_empty() {
                    info!(query = title, "No matches found, using direct search link");
                    Ok(self.fallback(title))
                } else {
                    Ok(self.finish(result, LookupOrigin::Upstream))
                }
            }
            Err(e) => {
                warn!(
                    query = title,
                    source = self.source.name(),
                    error = %e,
                    "Upstream lookup failed, using direct search link"
                );
                Ok(self.fallback(title))
            }
        }
    }

    /// One upstream call plus extraction, bounded by the timeout.
    async fn fetch_and_extract(&self, title: &str) -> Result<LookupResult, SourceError> {
        let source = self.source.name();
        let start = Instant::now();

        let fetched = tokio::time::timeout(self.timeout, self.source.fetch(title))
            .await
            .unwrap_or(Err(SourceError::Timeout));

        UPSTREAM_DURATION
            .with_label_values(&[source])
            .observe(start.elapsed().as_secs_f64());

        let records = fetched.and_then(|raw| self.source.extract(&raw));
        match &records {
            Ok(records) => {
                UPSTREAM_REQUESTS
                    .with_label_values(&[source, "success"])
                    .inc();
                LOOKUP_RESULTS
                    .with_label_values(&[source])
                    .observe(records.len() as f64);
            }
            Err(e) => {
                UPSTREAM_REQUESTS.with_label_values(&[source, e.kind()]).inc();
            }
        }

        records.map(LookupResult::from_records)
    }

    fn fallback(&self, title: &str) -> LookupOutcome {
        let record = MatchRecord::direct_search(title, self.profile.direct_search_url(title));
        self.finish(LookupResult::single(record), LookupOrigin::Fallback)
    }

    fn finish(&self, result: LookupResult, origin: LookupOrigin) -> LookupOutcome {
        LOOKUPS_TOTAL.with_label_values(&[origin.as_str()]).inc();
        LookupOutcome { result, origin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::example_profile;
    use crate::lookup::MatchKind;
    use crate::testing::MockResultSource;

    fn service(source: &Arc<MockResultSource>) -> LookupService {
        LookupService::new(
            Arc::clone(source) as Arc<dyn ResultSource>,
            example_profile(),
        )
    }

    fn record(id: u32) -> MatchRecord {
        MatchRecord {
            title: format!("Title {}", id),
            url: format!("https://target.example/movie-detail/{}/", id),
            id: Some(id.to_string()),
            year: None,
            kind: Some(MatchKind::Movie),
            is_direct_search: false,
        }
    }

    #[tokio::test]
    async fn test_blank_title_is_invalid_input() {
        let source = Arc::new(MockResultSource::new());
        let svc = service(&source);

        for blank in ["", "   ", "\t\n"] {
            let err = svc.lookup(blank).await.unwrap_err();
            assert!(matches!(err, LookupError::InvalidInput(_)));
        }
        assert_eq!(source.fetch_count().await, 0);
    }

    #[tokio::test]
    async fn test_upstream_results_are_returned_and_cached() {
        let source = Arc::new(MockResultSource::new());
        source.set_records(vec![record(1), record(2)]).await;
        let svc = service(&source);

        let first = svc.lookup_detailed("Matrix").await.unwrap();
        assert_eq!(first.origin, LookupOrigin::Upstream);
        assert_eq!(first.result.len(), 2);

        let second = svc.lookup_detailed("MATRIX").await.unwrap();
        assert_eq!(second.origin, LookupOrigin::Cache);
        assert_eq!(second.result, first.result);

        assert_eq!(source.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn test_failure_returns_fallback_and_is_not_cached() {
        let source = Arc::new(MockResultSource::new());
        source
            .set_next_error(SourceError::ConnectionFailed("refused".into()))
            .await;
        let svc = service(&source);

        let outcome = svc.lookup_detailed("Blade Runner").await.unwrap();
        assert_eq!(outcome.origin, LookupOrigin::Fallback);
        let records = outcome.result.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_direct_search);
        assert!(records[0].id.is_none());
        assert_eq!(
            records[0].url,
            "https://target.example/search?query=Blade%20Runner"
        );
        assert!(svc.cache().is_empty().await);

        // Next call reaches upstream again.
        source.set_records(vec![record(9)]).await;
        let outcome = svc.lookup_detailed("Blade Runner").await.unwrap();
        assert_eq!(outcome.origin, LookupOrigin::Upstream);
        assert_eq!(source.fetch_count().await, 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached_by_default() {
        let source = Arc::new(MockResultSource::new());
        let svc = service(&source);

        let first = svc.lookup_detailed("zzzz").await.unwrap();
        assert_eq!(first.origin, LookupOrigin::Fallback);
        let second = svc.lookup_detailed("zzzz").await.unwrap();
        assert_eq!(second.origin, LookupOrigin::Fallback);
        assert!(second.result.records()[0].is_direct_search);

        assert_eq!(source.fetch_count().await, 1);
        assert!(svc.cache().get("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_not_cached_when_disabled() {
        let source = Arc::new(MockResultSource::new());
        let svc = service(&source).with_cache_empty_results(false);

        svc.lookup("zzzz").await.unwrap();
        svc.lookup("zzzz").await.unwrap();

        assert_eq!(source.fetch_count().await, 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_falls_back() {
        let source = Arc::new(MockResultSource::new());
        source.set_next_extract_error(SourceError::InvalidPayload("not json".into()));
        let svc = service(&source);

        let outcome = svc.lookup_detailed("Alien").await.unwrap();
        assert_eq!(outcome.origin, LookupOrigin::Fallback);
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_times_out() {
        let source = Arc::new(MockResultSource::new());
        source.set_records(vec![record(1)]).await;
        source.set_delay(Duration::from_secs(30)).await;
        let svc = service(&source).with_timeout(Duration::from_secs(10));

        let outcome = svc.lookup_detailed("Slow").await.unwrap();
        assert_eq!(outcome.origin, LookupOrigin::Fallback);
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expiry_refetches() {
        let source = Arc::new(MockResultSource::new());
        source.set_records(vec![record(1)]).await;
        let svc = service(&source).with_cache(LookupCache::new(Duration::from_secs(3600)));

        svc.lookup("Matrix").await.unwrap();
        tokio::time::advance(Duration::from_secs(1800)).await;
        svc.lookup("Matrix").await.unwrap();
        assert_eq!(source.fetch_count().await, 1);

        tokio::time::advance(Duration::from_secs(1801)).await;
        svc.lookup("Matrix").await.unwrap();
        assert_eq!(source.fetch_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_records_from_source_are_merged() {
        let source = Arc::new(MockResultSource::new());
        let mut dup = record(1);
        dup.title = "Later".to_string();
        source.set_records(vec![record(1), dup, record(2)]).await;
        let svc = service(&source);

        let result = svc.lookup("x").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.records()[0].title, "Title 1");
    }
}
