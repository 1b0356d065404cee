//! fizzbuzz-stats HTTP server
//!
//! Starts an Axum web server exposing the FizzBuzz, stats, metrics and health endpoints.

use clap::Parser;
use fizzbuzz_stats::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = &cli.command {
        match output {
            Some(path) => {
                std::fs::write(path, generate_config_template())?;
                eprintln!("Wrote configuration template to {}", path);
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    // Load configuration
    let config = match cli.config_path() {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    match cli.config_path() {
        Some(path) => tracing::info!(config_path = %path, "Loaded configuration"),
        None => tracing::info!("No configuration file found, using built-in defaults"),
    }

    let host: std::net::IpAddr = config.server.host.parse().unwrap_or_else(|e| {
        tracing::warn!(
            host = %config.server.host,
            error = %e,
            "Invalid server.host, binding to 0.0.0.0"
        );
        std::net::IpAddr::from([0, 0, 0, 0])
    });
    let addr = SocketAddr::from((host, config.server.port));

    let state = AppState::new(Arc::new(config))?;
    let app = handlers::app(state);

    tracing::info!("Starting fizzbuzz-stats server on {}", addr);
    tracing::info!("FizzBuzz available at http://{}/api/v1/fizzbuzz", addr);
    tracing::info!("Stats available at http://{}/api/v1/stats", addr);
    tracing::info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Resolve on Ctrl+C so in-flight requests can finish
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
