//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, build revision, uptime, upstream template, and cumulative
//! submission statistics.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub git: String,
    pub uptime_seconds: u64,
    pub upstream: String,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub submissions_forwarded: u64,
    pub submissions_upstream_errors: u64,
    pub submissions_rejected: u64,
    pub submissions_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git: env!("FORMRELAY_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        upstream: state.upstream.base_template.clone(),
        stats: StatsResponse {
            submissions_forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            submissions_upstream_errors: state.stats.upstream_errors.load(Ordering::Relaxed),
            submissions_rejected: state.stats.rejected.load(Ordering::Relaxed),
            submissions_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
