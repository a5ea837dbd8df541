use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, page, search};
use crate::metrics::metrics_handler;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/search", get(search::search))
        .route("/info", get(handlers::info))
        .route("/config", get(handlers::get_config))
        .route("/cache", get(handlers::cache_stats));

    Router::new()
        .nest("/api", api_routes)
        // Short alias kept for links shared from the page
        .route("/search", get(search::search))
        .route("/health", get(handlers::health))
        .route("/metrics", get(metrics_handler))
        .route("/", get(page::index))
        .fallback(page::index)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
