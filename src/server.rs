//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the upstream
//! settings, HTTP client, stats, and uptime), [`build_router`] for
//! constructing the Axum router with middleware layers,
//! [`build_http_client`] for the connection-pooled upstream client, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{any, get};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::UpstreamConfig;
use crate::error::FormRelayError;
use crate::health::health_handler;
use crate::submit;

/// Process-wide submission counters, reported by `/health`.
#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub upstream_errors: AtomicU64,
    pub rejected: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

pub type HttpClient = reqwest::Client;

pub struct AppState {
    pub upstream: UpstreamConfig,
    pub http_client: HttpClient,
    /// Cap on a submission body, checked only after the method gate.
    pub max_body: usize,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(upstream: UpstreamConfig, http_client: HttpClient, max_body: usize) -> Self {
        Self {
            upstream,
            http_client,
            max_body,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

/// Upstream client. No request timeout and no retries: a stalled upstream
/// holds the submission open until the transport gives up.
pub fn build_http_client() -> Result<HttpClient, FormRelayError> {
    reqwest::Client::builder()
        .user_agent(concat!("formrelay/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .map_err(FormRelayError::HttpClient)
}

pub fn build_router(state: Arc<AppState>, submit_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(submit_path, any(submit::submit_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
