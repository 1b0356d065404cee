//! Prometheus metrics endpoint
//!
//! Exposes metrics in Prometheus text format for scraping.

use axum::{extract::State, http::StatusCode};

use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// # Response
///
/// - `200 OK` with metrics in Prometheus text format
/// - `500 Internal Server Error` if metrics collection fails
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/metrics
/// # HELP http_requests_total How many HTTP requests processed, partitioned by query params.
/// # TYPE http_requests_total counter
/// http_requests_total{int1="3",int2="5",limit="15",str1="fizz",str2="buzz"} 42
/// ```
pub async fn handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics().gather() {
        Ok(output) => (StatusCode::OK, output),
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to gather metrics for Prometheus scraping"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to gather metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fizzbuzz::FizzBuzzParams;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let state = AppState::new(Arc::new(Config::default())).unwrap();
        state
            .metrics()
            .record_request(&FizzBuzzParams::new(3, 5, 15, "fizz", "buzz"))
            .unwrap();

        let (status, body) = handler(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# HELP http_requests_total"));
        assert!(body.contains("# TYPE http_requests_total counter"));
    }

    #[tokio::test]
    async fn test_metrics_output_valid_prometheus_format() {
        let state = AppState::new(Arc::new(Config::default())).unwrap();
        let metrics = state.metrics();
        metrics
            .record_request(&FizzBuzzParams::new(2, 3, 10, "a", "b"))
            .unwrap();
        metrics
            .record_request(&FizzBuzzParams::new(2, 3, 11, "a", "b"))
            .unwrap();
        metrics.stats_query_failure("backend_unavailable");

        let (status, body) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);

        let metric_lines: Vec<&str> = body
            .lines()
            .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
            .collect();
        assert_eq!(metric_lines.len(), 3, "body:\n{}", body);

        // Format: metric_name{label1="value1",...} numeric_value
        let mut seen = std::collections::HashSet::new();
        for line in metric_lines {
            let (series, value) = line.rsplit_once(' ').expect("line should have a value");
            assert!(series.contains('{') && series.ends_with('}'), "line: {}", line);
            assert!(value.parse::<f64>().is_ok(), "line: {}", line);
            assert!(seen.insert(series.to_string()), "duplicate series: {}", series);
        }
    }

    #[tokio::test]
    async fn test_metrics_handler_with_empty_registry() {
        let state = AppState::new(Arc::new(Config::default())).unwrap();
        let (status, _body) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK, "Should succeed with empty registry");
    }
}
