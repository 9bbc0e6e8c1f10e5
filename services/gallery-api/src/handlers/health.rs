//! Health check.

use axum::{extract::Extension, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use storage::UrlMode;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub url_mode: UrlMode,
    pub url_cache: Option<UrlCacheHealth>,
}

#[derive(Debug, Serialize)]
pub struct UrlCacheHealth {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Persistence was disabled after a failed write
    pub degraded: bool,
}

/// GET /health
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    let url_cache = match &state.url_cache {
        Some(cache) => {
            let stats = cache.stats();
            Some(UrlCacheHealth {
                entries: cache.len().await,
                hits: stats.hits.load(Ordering::Relaxed),
                misses: stats.misses.load(Ordering::Relaxed),
                hit_rate: stats.hit_rate(),
                degraded: cache.is_degraded(),
            })
        }
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        url_mode: state.resolver.urls().mode(),
        url_cache,
    })
}
