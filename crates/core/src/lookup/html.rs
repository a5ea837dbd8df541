//! Extraction of matches from a search results page.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::urls::{DetailLink, SiteProfile};
use super::{deduplicate_by_url, MatchRecord, UNKNOWN_TITLE};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.name").expect("invalid selector"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("invalid selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("invalid selector"));

/// Extract detail-page matches from an HTML search results page.
///
/// Title elements (`p.name`) holding a detail link are read first. Only when
/// none are found does it fall back to scanning every anchor on the page.
/// Malformed markup just produces fewer records.
pub fn extract_html(profile: &SiteProfile, document: &str) -> Vec<MatchRecord> {
    let html = Html::parse_document(document);

    let mut records = extract_from_title_elements(profile, &html);
    if records.is_empty() {
        records = extract_from_anchors(profile, &html);
        debug!(count = records.len(), "HTML extraction used anchor scan");
    } else {
        debug!(count = records.len(), "HTML extraction used title elements");
    }

    deduplicate_by_url(records)
}

fn extract_from_title_elements(profile: &SiteProfile, html: &Html) -> Vec<MatchRecord> {
    html.select(&TITLE_SELECTOR)
        .filter_map(|name| {
            let anchor = name.select(&ANCHOR_SELECTOR).next()?;
            let link = profile.parse_detail_href(anchor.value().attr("href")?)?;
            let title = element_text(&anchor);
            Some(to_record(profile, link, title))
        })
        .collect()
}

fn extract_from_anchors(profile: &SiteProfile, html: &Html) -> Vec<MatchRecord> {
    html.select(&LINK_SELECTOR)
        .filter_map(|anchor| {
            let link = profile.parse_detail_href(anchor.value().attr("href")?)?;
            let title = element_text(&anchor).or_else(|| sibling_title(&anchor));
            Some(to_record(profile, link, title))
        })
        .collect()
}

/// Title from a `p.name` inside the anchor's nearest enclosing `div`.
fn sibling_title(anchor: &ElementRef) -> Option<String> {
    let container = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div")?;
    let name = container.select(&TITLE_SELECTOR).next()?;
    element_text(&name)
}

fn element_text(element: &ElementRef) -> Option<String> {
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn to_record(profile: &SiteProfile, link: DetailLink, title: Option<String>) -> MatchRecord {
    let url = profile.rewrite_host(&link.source_url);
    let id = profile.extract_id(&url).or(Some(link.id));
    MatchRecord {
        title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        url,
        id,
        year: None,
        kind: Some(link.kind),
        is_direct_search: false,
    }
}
