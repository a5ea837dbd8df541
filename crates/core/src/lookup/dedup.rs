//! Deduplication of match records by url.

use std::collections::HashSet;

use super::MatchRecord;

/// Deduplicate records by their target url.
///
/// The first record for a url is kept and later ones are dropped, so the
/// source's ranking order survives.
pub fn deduplicate_by_url(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}
