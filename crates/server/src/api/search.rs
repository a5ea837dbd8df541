//! Title search handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use filmlink_core::{LookupError, LookupResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub movie: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub movie: String,
    pub results: LookupResult,
    /// Where the results came from: cache, upstream or fallback.
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/search?movie=<title>
///
/// Look up a title. Always returns at least one result for a non-blank title.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let movie = params.movie.unwrap_or_default();

    match state.lookup().lookup_detailed(&movie).await {
        Ok(outcome) => {
            info!(
                movie = %movie,
                results = outcome.result.len(),
                source = outcome.origin.as_str(),
                "Search completed"
            );
            Ok(Json(SearchResponse {
                movie,
                results: outcome.result,
                source: outcome.origin.as_str(),
            }))
        }
        Err(LookupError::InvalidInput(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Movie title is required (use ?movie=<title>)".to_string(),
            }),
        )),
    }
}
