//! Prometheus metrics collection for fizzbuzz-stats
//!
//! This module provides metrics instrumentation for tracking:
//! - FizzBuzz requests partitioned by their query parameters
//! - Failures to record those requests
//! - Failures to answer stats queries
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.
//! The `http_requests_total` series are what the stats endpoint later
//! aggregates through the Prometheus query API.

use crate::fizzbuzz::FizzBuzzParams;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Name of the per-parameter request counter
pub const HTTP_REQUESTS_METRIC: &str = "http_requests_total";

/// Labels of the per-parameter request counter, in order
pub const HTTP_REQUESTS_LABELS: [&str; 5] = ["int1", "int2", "limit", "str1", "str2"];

/// Metrics collector for fizzbuzz-stats
///
/// Owns its registry, so every instance is isolated from the others.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    http_requests: IntCounterVec,
    metrics_recording_failures: IntCounterVec,
    stats_query_failures: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counter: one series per distinct (int1, int2, limit, str1, str2).
        //
        // Cardinality is unbounded by design: the stats endpoint needs every
        // parameter set as its own series to find the most requested one.
        let http_requests = IntCounterVec::new(
            Opts::new(
                HTTP_REQUESTS_METRIC,
                "How many HTTP requests processed, partitioned by query params.",
            ),
            &HTTP_REQUESTS_LABELS,
        )?;

        // Counter: recording failures by operation (record_request)
        let metrics_recording_failures = IntCounterVec::new(
            Opts::new(
                "fizzbuzz_metrics_recording_failures_total",
                "Total number of metrics recording operation failures by operation. \
                Indicates Prometheus internal errors - frequent failures require investigation.",
            ),
            &["operation"],
        )?;

        // Counter: stats query failures by error type
        //
        // Labels:
        // - error_type: backend_unavailable, backend_status,
        //   unexpected_result_shape, invalid_numeric_field
        let stats_query_failures = IntCounterVec::new(
            Opts::new(
                "fizzbuzz_stats_query_failures_total",
                "Total number of failed top request lookups against Prometheus by error type",
            ),
            &["error_type"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(metrics_recording_failures.clone()))?;
        registry.register(Box::new(stats_query_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            http_requests,
            metrics_recording_failures,
            stats_query_failures,
        })
    }

    /// Count one served FizzBuzz request for its parameter set
    ///
    /// Each label tuple owns an atomic counter, so concurrent calls never
    /// lose updates and unrelated tuples do not contend.
    ///
    /// # Errors
    ///
    /// Returns an error if the label count does not match the metric.
    pub fn record_request(&self, params: &FizzBuzzParams) -> Result<(), prometheus::Error> {
        let values = params.label_values();
        let labels: Vec<&str> = values.iter().map(String::as_str).collect();
        self.http_requests
            .get_metric_with_label_values(&labels[..])?
            .inc();
        Ok(())
    }

    /// Current count for a parameter set
    ///
    /// Reads the gathered snapshot, so an unseen tuple reports 0 without
    /// creating a series.
    pub fn request_count(&self, params: &FizzBuzzParams) -> u64 {
        let values = params.label_values();
        let expected: Vec<(&str, &str)> = HTTP_REQUESTS_LABELS
            .iter()
            .copied()
            .zip(values.iter().map(String::as_str))
            .collect();

        self.registry
            .gather()
            .iter()
            .filter(|mf| mf.name() == HTTP_REQUESTS_METRIC)
            .flat_map(|mf| mf.get_metric().iter())
            .find(|m| {
                expected.iter().all(|(name, value)| {
                    m.get_label()
                        .iter()
                        .any(|pair| pair.name() == *name && pair.value() == *value)
                })
            })
            .map(|m| m.counter.value.unwrap_or(0.0) as u64)
            .unwrap_or(0)
    }

    /// Record a metrics recording operation failure
    ///
    /// `operation` names the method that failed, e.g. "record_request".
    pub fn metrics_recording_failure(&self, operation: &str) {
        self.metrics_recording_failures
            .with_label_values(&[operation])
            .inc();
    }

    /// Get the total count of metrics recording failures across all operations
    pub fn metrics_recording_failures_count(&self) -> u64 {
        self.sum_family("fizzbuzz_metrics_recording_failures_total")
    }

    /// Record a failed stats lookup
    pub fn stats_query_failure(&self, error_type: &str) {
        self.stats_query_failures
            .with_label_values(&[error_type])
            .inc();
    }

    /// Get the total count of stats lookup failures across all error types
    pub fn stats_query_failures_count(&self) -> u64 {
        self.sum_family("fizzbuzz_stats_query_failures_total")
    }

    /// Sum a counter family across all of its label combinations
    fn sum_family(&self, name: &str) -> u64 {
        self.registry
            .gather()
            .iter()
            .find(|mf| mf.name() == name)
            .map(|mf| {
                mf.get_metric()
                    .iter()
                    .map(|m| m.counter.value.unwrap_or(0.0) as u64)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Gather all metrics and encode them in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let metric_count = metric_families.len();

        tracing::debug!(
            metric_family_count = metric_count,
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                metric_family_count = metric_count,
                "Prometheus text encoder failed"
            );
            prometheus::Error::Msg(format!(
                "Failed to encode {} metric families: {}",
                metric_count, e
            ))
        })?;

        String::from_utf8(buffer).map_err(|e| {
            let valid_up_to = e.utf8_error().valid_up_to();
            tracing::error!(
                invalid_byte_index = valid_up_to,
                "Prometheus encoder produced invalid UTF-8"
            );
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                valid_up_to, e
            ))
        })
    }
}
