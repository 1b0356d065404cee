//! Error types for fizzbuzz-stats
//!
//! All errors implement `IntoResponse` for Axum handlers.

use crate::stats::StatsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Query parameters failed validation; one message per problem
    #[error("Invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Validation(errors) = self {
            let body = Json(serde_json::json!({
                "errors": errors,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = match &self {
            Self::Stats(StatsError::BackendUnavailable { .. })
            | Self::Stats(StatsError::BackendStatus { .. }) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
