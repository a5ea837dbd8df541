//! Mock result source for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::lookup::{MatchRecord, RawResponse, ResultSource, SourceError};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The title that was searched.
    pub title: String,
    /// When the fetch was made.
    pub timestamp: Instant,
}

/// A query handler that produces records dynamically based on the title.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<MatchRecord>> + Send + Sync>;

/// Mock implementation of the ResultSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable records
/// - Track fetched titles for assertions
/// - Simulate fetch failures, extraction failures and slow upstreams
///
/// Records travel through `RawResponse::body` as JSON, so the usual
/// fetch-then-extract split is exercised.
///
/// # Example
///
/// ```rust,ignore
/// use filmlink_core::testing::{MockResultSource, fixtures};
///
/// let source = MockResultSource::new();
/// source.set_records(vec![fixtures::movie_record("The Matrix", 301)]).await;
///
/// let service = LookupService::new(Arc::new(source), profile);
/// let result = service.lookup("matrix").await?;
/// assert_eq!(result.len(), 1);
/// ```
pub struct MockResultSource {
    name: String,
    /// Configured records to return.
    records: Arc<RwLock<Vec<MatchRecord>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// If set, the next extraction will fail with this error.
    /// A std mutex, since `extract` is synchronous.
    next_extract_error: Arc<Mutex<Option<SourceError>>>,
    /// Simulated upstream latency.
    delay: Arc<RwLock<Option<Duration>>>,
    /// Query handler for dynamic records based on the title.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockResultSource")
            .field("name", &self.name)
            .field("records", &"<records>")
            .field("fetches", &"<fetches>")
            .field("next_error", &"<next_error>")
            .field("delay", &"<delay>")
            .field("query_handler", &"<handler>")
            .finish()
    }
}

impl Default for MockResultSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResultSource {
    /// Create a new mock source that finds nothing.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock source reporting the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_extract_error: Arc::new(Mutex::new(None)),
            delay: Arc::new(RwLock::new(None)),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the records to return for subsequent fetches.
    pub async fn set_records(&self, records: Vec<MatchRecord>) {
        *self.records.write().await = records;
    }

    /// Clear all records.
    pub async fn clear_records(&self) {
        self.records.write().await.clear();
    }

    /// Make the next fetch fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make the next extraction fail with the given error.
    pub fn set_next_extract_error(&self, error: SourceError) {
        *self
            .next_extract_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Set a handler that decides records per title.
    ///
    /// Returning `None` falls back to the configured records.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<MatchRecord>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches made.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Clear recorded fetches.
    pub async fn clear_fetches(&self) {
        self.fetches.write().await.clear();
    }
}

#[async_trait]
impl ResultSource for MockResultSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, title: &str) -> Result<RawResponse, SourceError> {
        self.fetches.write().await.push(RecordedFetch {
            title: title.to_string(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let handled = self
            .query_handler
            .read()
            .await
            .as_ref()
            .and_then(|handler| handler(title));
        let records = match handled {
            Some(records) => records,
            None => self.records.read().await.clone(),
        };

        let body = serde_json::to_string(&records)
            .map_err(|e| SourceError::InvalidPayload(e.to_string()))?;

        Ok(RawResponse {
            url: format!("mock://{}/search?q={}", self.name, urlencoding::encode(title)),
            body,
        })
    }

    fn extract(&self, raw: &RawResponse) -> Result<Vec<MatchRecord>, SourceError> {
        let injected = self
            .next_extract_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(error) = injected {
            return Err(error);
        }

        serde_json::from_str(&raw.body).map_err(|e| SourceError::InvalidPayload(e.to_string()))
    }
}
