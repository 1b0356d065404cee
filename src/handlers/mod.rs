//! HTTP request handlers for the fizzbuzz-stats API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::stats::{PrometheusClient, TopRequestSource};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod fizzbuzz;
pub mod health;
pub mod metrics;
pub mod stats;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    top_requests: Arc<dyn TopRequestSource>,
}

impl AppState {
    /// Create a new AppState backed by the configured Prometheus server
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration or HTTP client construction fails.
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to register metrics: {}", e)))?;
        let client = PrometheusClient::new(&config.prometheus).map_err(|e| {
            AppError::Internal(format!("Failed to build Prometheus HTTP client: {}", e))
        })?;

        tracing::info!(
            prometheus_url = %client.query_url(),
            timeout_seconds = config.prometheus.timeout_seconds,
            "Stats lookups will query Prometheus"
        );

        Ok(Self::with_parts(config, Arc::new(metrics), Arc::new(client)))
    }

    /// Assemble state from explicit parts (used to inject a stub stats source)
    pub fn with_parts(
        config: Arc<Config>,
        metrics: Arc<Metrics>,
        top_requests: Arc<dyn TopRequestSource>,
    ) -> Self {
        Self {
            config,
            metrics,
            top_requests,
        }
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get reference to the top request source
    pub fn top_requests(&self) -> &dyn TopRequestSource {
        self.top_requests.as_ref()
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/fizzbuzz", get(fizzbuzz::handler))
        .route("/api/v1/stats", get(stats::handler))
        .route("/metrics", get(metrics::handler))
        .route("/health", get(health::handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appstate_new_creates_state() {
        let state = AppState::new(Arc::new(Config::default())).expect("should create AppState");
        assert_eq!(state.config().server.port, 8080);
        assert_eq!(state.metrics().stats_query_failures_count(), 0);
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = AppState::new(Arc::new(Config::default())).unwrap();
        let state2 = state.clone();
        assert_eq!(state2.config().prometheus.url, "http://prometheus:9090");
    }

    #[test]
    fn test_appstate_clones_share_metrics() {
        let state = AppState::new(Arc::new(Config::default())).unwrap();
        let state2 = state.clone();
        state.metrics().stats_query_failure("backend_unavailable");
        assert_eq!(state2.metrics().stats_query_failures_count(), 1);
    }
}
