//! Testing utilities and mock implementations.
//!
//! This module provides a mock `ResultSource` and record fixtures, allowing
//! lookup and HTTP tests without reaching the real movie database.
//!
//! # Example
//!
//! ```rust,ignore
//! use filmlink_core::testing::{MockResultSource, fixtures};
//!
//! let source = MockResultSource::new();
//!
//! // Configure responses
//! source.set_records(vec![fixtures::movie_record("The Matrix", 301)]).await;
//! source.set_next_error(SourceError::Timeout).await;
//!
//! // Use in a LookupService...
//! ```

mod mock_source;

pub use mock_source::{MockResultSource, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::SiteConfig;
    use crate::lookup::{MatchKind, MatchRecord, SiteProfile};

    /// Create a movie record on the default target host.
    pub fn movie_record(title: &str, id: u32) -> MatchRecord {
        MatchRecord {
            title: title.to_string(),
            url: format!("https://www.sspoisk.ru/film/{}/", id),
            id: Some(id.to_string()),
            year: None,
            kind: Some(MatchKind::Movie),
            is_direct_search: false,
        }
    }

    /// Create a movie record with its release year in the title.
    pub fn movie_with_year(name: &str, year: u32, id: u32) -> MatchRecord {
        let mut record = movie_record(&format!("{} ({})", name, year), id);
        record.year = Some(year.to_string());
        record
    }

    /// Create a series record on the default target host.
    pub fn series_record(title: &str, id: u32) -> MatchRecord {
        MatchRecord {
            title: title.to_string(),
            url: format!("https://www.sspoisk.ru/series/{}/", id),
            id: Some(id.to_string()),
            year: None,
            kind: Some(MatchKind::Series),
            is_direct_search: false,
        }
    }

    /// Site profile with the built-in defaults.
    pub fn default_profile() -> SiteProfile {
        SiteProfile::new(&SiteConfig::default()).expect("default site config is valid")
    }
}
