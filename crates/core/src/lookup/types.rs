//! Types for the title lookup system.

use serde::{Deserialize, Serialize};

use super::dedup::deduplicate_by_url;

/// Title used when a match has no recoverable name.
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Kind of a matched item, as inferred from its detail route or type tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Movie,
    Series,
}

/// One normalized search match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecord {
    /// Display title (may include the release year).
    pub title: String,
    /// Detail page URL on the target host.
    pub url: String,
    /// Numeric identifier taken from the detail path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Release year, when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Movie or series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MatchKind>,
    /// Set only on the synthesized direct-search record.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_direct_search: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MatchRecord {
    /// Build the direct-search record used when no structured match exists.
    pub fn direct_search(query: &str, url: String) -> Self {
        Self {
            title: format!("Search for: {}", query),
            url,
            id: None,
            year: None,
            kind: None,
            is_direct_search: true,
        }
    }
}

/// Ordered list of matches, unique by `url`.
///
/// Source ranking order is kept; when two records share a url the first one
/// seen wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LookupResult {
    records: Vec<MatchRecord>,
}

impl LookupResult {
    /// Build a result from raw records, dropping duplicate urls.
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self {
            records: deduplicate_by_url(records),
        }
    }

    /// A result holding only the given record.
    pub fn single(record: MatchRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<MatchRecord> {
        self.records
    }
}

impl From<Vec<MatchRecord>> for LookupResult {
    fn from(records: Vec<MatchRecord>) -> Self {
        Self::from_records(records)
    }
}

impl IntoIterator for LookupResult {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Raw body of a successful upstream response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// URL that was requested.
    pub url: String,
    /// Response body as text.
    pub body: String,
}

/// Where a lookup answer came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LookupOrigin {
    /// Served from the in-memory cache.
    Cache,
    /// Fetched from the upstream source.
    Upstream,
    /// Synthesized direct-search link.
    Fallback,
}

impl LookupOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOrigin::Cache => "cache",
            LookupOrigin::Upstream => "upstream",
            LookupOrigin::Fallback => "fallback",
        }
    }
}

/// A lookup result together with its origin.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub result: LookupResult,
    pub origin: LookupOrigin,
}
