//! HTTP API for the cricket chat proxy.
//!
//! This module provides:
//! - Health and metrics monitoring
//! - The question-asking passthrough
//! - The quick-action passthroughs (fact, joke, quiz)

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{I18nError, ServiceError, ServiceResult};
use crate::i18n::I18n;
use crate::proxy::CricketProxy;

pub mod ask;
pub mod quick_actions;

use ask::ask_handler;
use quick_actions::{joke_handler, quick_fact_handler, quiz_handler};

/// Questions are short; anything larger is not a chat message
const MAX_ASK_BODY_BYTES: usize = 16 * 1024;

/// Application state
pub struct AppState {
    pub proxy: Arc<CricketProxy>,
    pub i18n: Arc<I18n>,
    pub start_time: Instant,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create an i18n-aware error from a service error
    pub fn i18n_error(&self, error: ServiceError) -> I18nError {
        I18nError::new(error, self.i18n.clone(), "en")
    }
}

/// Build the API router
pub fn router(proxy: Arc<CricketProxy>, metrics: Option<PrometheusHandle>) -> Router {
    let state = Arc::new(AppState {
        proxy,
        i18n: Arc::new(I18n::new()),
        start_time: Instant::now(),
        metrics,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/ask",
            post(ask_handler).layer(DefaultBodyLimit::max(MAX_ASK_BODY_BYTES)),
        )
        .route("/quick-fact", get(quick_fact_handler))
        .route("/cricket-joke", get(joke_handler))
        .route("/cricket-quiz", get(quiz_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count a proxied request by endpoint and outcome
pub(crate) fn record_outcome<T>(endpoint: &'static str, result: &ServiceResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.error_code(),
    };
    metrics::counter!(
        "cricket_proxy_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
}

// === Health & Metrics ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: state.i18n.get("en", "health-status-healthy", None),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        upstream: state.proxy.upstream_url().to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    upstream: String,
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
