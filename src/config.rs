//! Configuration management for fizzbuzz-stats
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section is optional; omitted values fall back to the defaults below.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Upper bound for `prometheus.timeout_seconds`
const MAX_TIMEOUT_SECONDS: u64 = 300;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prometheus: PrometheusConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Prometheus server queried by the stats endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrometheusConfig {
    /// Base URL, e.g. `http://prometheus:9090`
    #[serde(default = "default_prometheus_url")]
    pub url: String,
    #[serde(default = "default_query_path")]
    pub query_path: String,
    #[serde(default = "default_prometheus_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            url: default_prometheus_url(),
            query_path: default_query_path(),
            timeout_seconds: default_prometheus_timeout(),
        }
    }
}

fn default_prometheus_url() -> String {
    "http://prometheus:9090".to_string()
}

fn default_query_path() -> String {
    "/api/v1/query".to_string()
}

fn default_prometheus_timeout() -> u64 {
    10
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()` and `from_str()`, but can
    /// also be called explicitly when constructing Config by hand.
    pub fn validate(&self) -> AppResult<()> {
        let prometheus = &self.prometheus;

        if !prometheus.url.starts_with("http://") && !prometheus.url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "prometheus.url '{}' must start with 'http://' or 'https://'",
                prometheus.url
            )));
        }

        if !prometheus.query_path.starts_with('/') {
            return Err(AppError::Config(format!(
                "prometheus.query_path '{}' must start with '/' (e.g. '/api/v1/query')",
                prometheus.query_path
            )));
        }

        if prometheus.timeout_seconds == 0 {
            return Err(AppError::Config(
                "prometheus.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if prometheus.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "prometheus.timeout_seconds cannot exceed {} seconds, got {}",
                MAX_TIMEOUT_SECONDS, prometheus.timeout_seconds
            )));
        }

        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::Config(format!(
                "observability.log_level '{}' is invalid, expected one of: {}",
                self.observability.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
