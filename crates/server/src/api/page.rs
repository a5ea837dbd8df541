//! Browser search page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the search page. Also used as the fallback for unknown paths.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
