//! Stats endpoint handler
//!
//! Reports the most requested FizzBuzz parameter set via GET /api/v1/stats.

use crate::error::AppResult;
use crate::handlers::AppState;
use crate::stats::StatsResponse;
use axum::{Json, extract::State};

/// GET /api/v1/stats handler
///
/// # Response
///
/// - `200 OK` with `{"top_fizzbuzz_request": null}` before any request was recorded,
///   including when the top series has a hit count of 0
/// - `200 OK` with `{"top_fizzbuzz_request": {"request_params": {...}, "num_hits": N}}`
/// - `502 Bad Gateway` if Prometheus is unreachable or answers with an error status
/// - `500 Internal Server Error` if the Prometheus response cannot be decoded
pub async fn handler(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let top = state.top_requests().top_request().await.map_err(|e| {
        tracing::error!(
            error = %e,
            error_type = e.kind(),
            "Failed to look up top FizzBuzz request from Prometheus"
        );
        state.metrics().stats_query_failure(e.kind());
        e
    })?;

    let top = top.filter(|top| top.hits > 0);

    match &top {
        Some(top) => tracing::debug!(
            num_hits = top.hits,
            int1 = top.params.divisor_a,
            int2 = top.params.divisor_b,
            limit = top.params.limit,
            "Resolved top FizzBuzz request"
        ),
        None => tracing::debug!("No FizzBuzz requests recorded yet"),
    }

    Ok(Json(StatsResponse {
        top_fizzbuzz_request: top,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fizzbuzz::FizzBuzzParams;
    use crate::metrics::Metrics;
    use crate::stats::{DecodeError, StatsError, TopRequest, TopRequestSource};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Source that answers every lookup with a fixed outcome
    struct FixedSource(fn() -> Result<Option<TopRequest>, StatsError>);

    #[async_trait]
    impl TopRequestSource for FixedSource {
        async fn top_request(&self) -> Result<Option<TopRequest>, StatsError> {
            (self.0)()
        }
    }

    fn state_with(source: FixedSource) -> AppState {
        AppState::with_parts(
            Arc::new(Config::default()),
            Arc::new(Metrics::new().unwrap()),
            Arc::new(source),
        )
    }

    #[tokio::test]
    async fn test_stats_handler_absent() {
        let state = state_with(FixedSource(|| Ok(None)));
        let Json(body) = handler(State(state)).await.expect("should succeed");
        assert!(body.top_fizzbuzz_request.is_none());
    }

    #[tokio::test]
    async fn test_stats_handler_present() {
        let state = state_with(FixedSource(|| {
            Ok(Some(TopRequest {
                params: FizzBuzzParams::new(3, 5, 15, "fizz", "buzz"),
                hits: 42,
            }))
        }));
        let Json(body) = handler(State(state)).await.unwrap();
        let top = body.top_fizzbuzz_request.expect("should be present");
        assert_eq!(top.hits, 42);
        assert_eq!(top.params.token_b, "buzz");
    }

    #[tokio::test]
    async fn test_stats_handler_zero_hits_is_absent() {
        let state = state_with(FixedSource(|| {
            Ok(Some(TopRequest {
                params: FizzBuzzParams::new(3, 5, 15, "a", "b"),
                hits: 0,
            }))
        }));
        let Json(body) = handler(State(state)).await.unwrap();
        assert!(body.top_fizzbuzz_request.is_none());
    }

    #[tokio::test]
    async fn test_stats_handler_counts_failures() {
        let state = state_with(FixedSource(|| {
            Err(StatsError::from(DecodeError::UnexpectedResultShape {
                count: 3,
                raw: "[]".to_string(),
            }))
        }));

        let result = handler(State(state.clone())).await;

        assert!(result.is_err());
        assert_eq!(state.metrics().stats_query_failures_count(), 1);
    }
}
