//! In-memory lookup cache with a fixed time-to-live.
//!
//! Entries are never swept. An expired entry is treated as absent on `get`
//! and replaced by the next `put` for the same key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use super::LookupResult;

/// Default time-to-live for cached lookups.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    result: LookupResult,
    fetched_at: Instant,
}

/// Cache counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Stored entries, expired ones included.
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub ttl_secs: u64,
}

/// Thread-safe lookup cache keyed by case-folded query.
pub struct LookupCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl LookupCache {
    /// Create a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache key for a raw query: case-folded, otherwise untouched.
    pub fn normalize_key(query: &str) -> String {
        query.to_lowercase()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached result for `key`, if present and younger than the TTL.
    pub async fn get(&self, key: &str) -> Option<LookupResult> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.result.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store or overwrite `key`, stamped with the current time.
    pub async fn put(&self, key: &str, result: LookupResult) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                result,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
