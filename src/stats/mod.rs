//! Most-requested parameter set lookup
//!
//! The service does not store request history itself. Every served request
//! increments `http_requests_total`, Prometheus scrapes it, and the stats
//! endpoint asks Prometheus for the label set with the highest total.

use crate::fizzbuzz::FizzBuzzParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod decoder;

pub use client::{PrometheusClient, StatsError};
pub use decoder::{DecodeError, decode};

/// The most requested parameter set and how often it was requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRequest {
    #[serde(rename = "request_params")]
    pub params: FizzBuzzParams,
    #[serde(rename = "num_hits")]
    pub hits: u64,
}

/// Body of a successful `/api/v1/stats` response
///
/// `top_fizzbuzz_request` is `null` until the first request has been recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub top_fizzbuzz_request: Option<TopRequest>,
}

/// Source of the most requested parameter set
///
/// Implemented by [`PrometheusClient`]; handlers only depend on this trait.
#[async_trait]
pub trait TopRequestSource: Send + Sync {
    /// Look up the most requested parameter set, `None` if nothing was recorded
    async fn top_request(&self) -> Result<Option<TopRequest>, StatsError>;
}
