use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use filmlink_core::{CacheStats, SanitizedConfig};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Service name reported by health and info.
pub const SERVICE_NAME: &str = "filmlink";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: i64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        service: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        uptime_secs: (now - state.started_at()).num_seconds(),
    })
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'static str>,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        description: "Movie and series search with mirror-site detail links".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/api/search",
                method: "GET",
                params: Some("movie"),
                description: "Search movies and series by title",
            },
            EndpointInfo {
                path: "/search",
                method: "GET",
                params: Some("movie"),
                description: "Alias of /api/search",
            },
            EndpointInfo {
                path: "/api/info",
                method: "GET",
                params: None,
                description: "Service description",
            },
            EndpointInfo {
                path: "/api/cache",
                method: "GET",
                params: None,
                description: "Lookup cache statistics",
            },
            EndpointInfo {
                path: "/api/config",
                method: "GET",
                params: None,
                description: "Current configuration without secrets",
            },
            EndpointInfo {
                path: "/metrics",
                method: "GET",
                params: None,
                description: "Prometheus metrics",
            },
            EndpointInfo {
                path: "/health",
                method: "GET",
                params: None,
                description: "Service health check",
            },
        ],
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.lookup().cache().stats().await)
}
