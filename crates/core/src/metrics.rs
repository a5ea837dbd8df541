//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Lookups (by origin: cache, upstream, fallback)
//! - Upstream requests (count and latency per source)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Lookup Metrics
// =============================================================================

/// Lookups total by origin.
pub static LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("filmlink_lookups_total", "Total title lookups"),
        &["origin"], // "cache", "upstream", "fallback"
    )
    .unwrap()
});

/// Matches returned per upstream lookup.
pub static LOOKUP_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "filmlink_lookup_results",
            "Number of matches extracted per upstream lookup",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream requests by source and result.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "filmlink_upstream_requests_total",
            "Total upstream search requests",
        ),
        &["source", "result"], // result: "success" or an error kind
    )
    .unwrap()
});

/// Upstream request duration in seconds.
pub static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "filmlink_upstream_duration_seconds",
            "Duration of upstream search requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LOOKUPS_TOTAL.clone()),
        Box::new(LOOKUP_RESULTS.clone()),
        Box::new(UPSTREAM_REQUESTS.clone()),
        Box::new(UPSTREAM_DURATION.clone()),
    ]
}
