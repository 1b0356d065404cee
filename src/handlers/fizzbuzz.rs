//! FizzBuzz endpoint handler
//!
//! Handles GET /api/v1/fizzbuzz?int1=..&int2=..&limit=..&str1=..&str2=..

use crate::error::AppError;
use crate::fizzbuzz::{self, FizzBuzzParams};
use crate::handlers::AppState;
use axum::{
    body::Body,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

/// Smallest accepted value for `int1`, `int2` and `limit`
pub const MIN_VALUE: i64 = 1;

/// Largest accepted value for `int1`, `int2` and `limit`
pub const MAX_VALUE: i64 = i32::MAX as i64;

/// Query string as sent by the client, before validation
#[derive(Debug, Default, Deserialize)]
struct RawFizzBuzzQuery {
    int1: Option<String>,
    int2: Option<String>,
    limit: Option<String>,
    str1: Option<String>,
    str2: Option<String>,
}

/// Validated FizzBuzz parameters extracted from the query string
///
/// Rejects with `400 {"errors": [...]}` listing every invalid field.
#[derive(Debug, Clone)]
pub struct FizzBuzzQuery(pub FizzBuzzParams);

impl<S> FromRequestParts<S> for FizzBuzzQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawFizzBuzzQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))?;

        validate(raw).map(FizzBuzzQuery).map_err(AppError::Validation)
    }
}

fn validate(raw: RawFizzBuzzQuery) -> Result<FizzBuzzParams, Vec<String>> {
    let mut errors = Vec::new();

    let divisor_a = bounded_int("int1", raw.int1.as_deref(), &mut errors);
    let divisor_b = bounded_int("int2", raw.int2.as_deref(), &mut errors);
    let limit = bounded_int("limit", raw.limit.as_deref(), &mut errors);
    let token_a = required("str1", raw.str1, &mut errors);
    let token_b = required("str2", raw.str2, &mut errors);

    match (divisor_a, divisor_b, limit, token_a, token_b) {
        (Some(divisor_a), Some(divisor_b), Some(limit), Some(token_a), Some(token_b))
            if errors.is_empty() =>
        {
            Ok(FizzBuzzParams {
                divisor_a,
                divisor_b,
                limit,
                token_a,
                token_b,
            })
        }
        _ => Err(errors),
    }
}

fn required(field: &str, value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(format!("{}: required", field));
            None
        }
    }
}

fn bounded_int(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<i64> {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        errors.push(format!("{}: required", field));
        return None;
    };

    // Parse as i128 so out-of-range integers report bounds, not syntax.
    let Ok(parsed) = raw.trim().parse::<i128>() else {
        errors.push(format!("{}: must be an integer, got {:?}", field, raw));
        return None;
    };

    if parsed < MIN_VALUE as i128 {
        errors.push(format!("{}: must be at least {}", field, MIN_VALUE));
        None
    } else if parsed > MAX_VALUE as i128 {
        errors.push(format!("{}: must be at most {}", field, MAX_VALUE));
        None
    } else {
        i64::try_from(parsed).ok()
    }
}

/// Number of sequence items encoded per body chunk
const ITEMS_PER_CHUNK: usize = 1024;

/// GET /api/v1/fizzbuzz handler
///
/// Counts the request in `http_requests_total`, then streams
/// `{"result": [...]}` as the sequence is produced. Memory use stays flat for
/// any accepted limit.
pub async fn handler(
    State(state): State<AppState>,
    FizzBuzzQuery(params): FizzBuzzQuery,
) -> Response {
    if let Err(e) = state.metrics().record_request(&params) {
        tracing::error!(
            error = %e,
            int1 = params.divisor_a,
            int2 = params.divisor_b,
            limit = params.limit,
            "Failed to record FizzBuzz request metric"
        );
        state.metrics().metrics_recording_failure("record_request");
    }

    tracing::debug!(
        int1 = params.divisor_a,
        int2 = params.divisor_b,
        limit = params.limit,
        "Streaming FizzBuzz sequence"
    );

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(result_stream(params)),
    )
        .into_response()
}

/// Encode the sequence for `params` as a chunked `{"result": [...]}` document
fn result_stream(
    params: FizzBuzzParams,
) -> impl Stream<Item = Result<String, serde_json::Error>> + Send + 'static {
    let mut items = fizzbuzz::into_sequence(params).enumerate().peekable();

    let chunks = stream::iter(std::iter::from_fn(move || {
        items.peek()?;

        let mut chunk = String::new();
        for (index, item) in items.by_ref().take(ITEMS_PER_CHUNK) {
            if index > 0 {
                chunk.push(',');
            }
            match serde_json::to_string(&item) {
                Ok(encoded) => chunk.push_str(&encoded),
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(chunk))
    }));

    stream::iter([Ok(r#"{"result":["#.to_string())])
        .chain(chunks)
        .chain(stream::iter([Ok("]}".to_string())]))
}
