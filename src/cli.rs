//! Command-line interface for fizzbuzz-stats
//!
//! Provides argument parsing and subcommand handling for the server binary.

use clap::{Parser, Subcommand};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Generalized FizzBuzz HTTP service with request statistics
#[derive(Parser)]
#[command(name = "fizzbuzz-stats")]
#[command(version)]
#[command(about = "Generalized FizzBuzz HTTP service with request statistics")]
#[command(
    long_about = "Serves generalized FizzBuzz sequences over HTTP, counts every request \
    in a Prometheus counter, and reports the most requested parameter set by querying Prometheus."
)]
pub struct Cli {
    /// Path to configuration file (built-in defaults are used if the default file is absent)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Configuration path to load, or `None` to run with defaults
    ///
    /// An explicit `--config` is always returned so a missing file is an error.
    pub fn config_path(&self) -> Option<&str> {
        match &self.config {
            Some(path) => Some(path.as_str()),
            None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Some(DEFAULT_CONFIG_PATH)
            }
            None => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# fizzbuzz-stats Configuration
# ============================
#
# Every setting below is optional; the values shown are the defaults.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8080

# ─────────────────────────────────────────────────────────────────────────────
# PROMETHEUS
# ─────────────────────────────────────────────────────────────────────────────
#
# Prometheus must scrape this service's /metrics endpoint. /api/v1/stats
# then asks it for:
#
#   topk(1, sum(http_requests_total) by (int1,int2,limit,str1,str2))

[prometheus]
# Base URL of the Prometheus server
url = "http://prometheus:9090"

# Instant query API path
query_path = "/api/v1/query"

# Per-query timeout in seconds (1-300)
timeout_seconds = 10

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG overrides this when set.
log_level = "info"
"#
}
