//! Health check endpoint
//!
//! Provides a simple liveness check for monitoring and load balancers.
//! Does not contact Prometheus; a stats backend outage is reported on
//! `/api/v1/stats` and in `fizzbuzz_stats_query_failures_total`.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
}

/// Health check handler
pub async fn handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "OK" }))
}
