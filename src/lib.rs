//! fizzbuzz-stats - Generalized FizzBuzz HTTP service with request statistics
//!
//! This library computes FizzBuzz sequences for caller-supplied divisors and
//! tokens, counts each request in a Prometheus counter labelled by its
//! parameters, and reports the most requested parameter set by querying
//! Prometheus.

pub mod cli;
pub mod config;
pub mod error;
pub mod fizzbuzz;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod stats;
pub mod telemetry;
