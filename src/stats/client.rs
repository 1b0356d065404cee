//! Prometheus HTTP API client
//!
//! Issues the top-1 aggregation over `http_requests_total` and hands the raw
//! body to the decoder. No retries: a failed lookup is reported to the caller.

use crate::config::PrometheusConfig;
use crate::metrics::{HTTP_REQUESTS_LABELS, HTTP_REQUESTS_METRIC};
use crate::stats::decoder::{self, DecodeError};
use crate::stats::{TopRequest, TopRequestSource};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of body bytes kept in a `BackendStatus` error
const ERROR_BODY_PREVIEW: usize = 500;

/// Errors from looking up the most requested parameter set
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Failed to query Prometheus at {url}: {source}")]
    BackendUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Prometheus returned HTTP {status}: {body}")]
    BackendStatus { status: StatusCode, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl StatsError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BackendUnavailable { .. } => "backend_unavailable",
            Self::BackendStatus { .. } => "backend_status",
            Self::Decode(e) => e.kind(),
        }
    }
}

/// The PromQL expression selecting the most requested label set
///
/// `topk(1, sum(http_requests_total) by (int1,int2,limit,str1,str2))`
pub fn top_request_query() -> String {
    format!(
        "topk(1, sum({}) by ({}))",
        HTTP_REQUESTS_METRIC,
        HTTP_REQUESTS_LABELS.join(",")
    )
}

/// Client for the Prometheus instant query endpoint
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    query_url: String,
}

impl PrometheusClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g., TLS backend
    /// initialization failure).
    pub fn new(config: &PrometheusConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let query_url = format!(
            "{}{}",
            config.url.trim_end_matches('/'),
            config.query_path
        );

        Ok(Self { http, query_url })
    }

    /// Full URL of the instant query endpoint
    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

#[async_trait]
impl TopRequestSource for PrometheusClient {
    async fn top_request(&self) -> Result<Option<TopRequest>, StatsError> {
        let query = top_request_query();

        tracing::debug!(url = %self.query_url, query = %query, "Querying Prometheus for top request");

        let unavailable = |source| StatsError::BackendUnavailable {
            url: self.query_url.clone(),
            source,
        };

        let response = self
            .http
            .get(&self.query_url)
            .query(&[("query", query.as_str())])
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        let body = response.bytes().await.map_err(unavailable)?;

        if !status.is_success() {
            let preview_len = body.len().min(ERROR_BODY_PREVIEW);
            return Err(StatsError::BackendStatus {
                status,
                body: String::from_utf8_lossy(&body[..preview_len]).into_owned(),
            });
        }

        Ok(decoder::decode(&body)?)
    }
}
