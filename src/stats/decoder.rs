//! Decoding of Prometheus top-1 instant query responses
//!
//! The response shape is the standard `/api/v1/query` envelope:
//!
//! ```json
//! {
//!   "status": "success",
//!   "data": {
//!     "resultType": "vector",
//!     "result": [
//!       { "metric": { "int1": "2", "str1": "fizz", ... }, "value": [1680208159.058, "5"] }
//!     ]
//!   }
//! }
//! ```
//!
//! Only `data.result[].metric` and `data.result[].value` are read. Missing
//! fields fall back to explicit defaults so partial responses decode.

use crate::fizzbuzz::FizzBuzzParams;
use crate::stats::TopRequest;
use serde::Deserialize;
use std::collections::HashMap;
use std::num::ParseIntError;
use thiserror::Error;

/// Field name reported when the aggregated value is not an integer
pub const HIT_COUNT_FIELD: &str = "hit count";

/// Errors produced while decoding a top-1 query response
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A top-1 query returned more than one series
    #[error("Unexpected prometheus topk metrics result: expected at most 1 series, got {count}: {raw}")]
    UnexpectedResultShape { count: usize, raw: String },

    /// A value or label expected to hold an integer did not
    #[error("Non integer value {value:?} for request {field}")]
    InvalidNumericField {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl DecodeError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedResultShape { .. } => "unexpected_result_shape",
            Self::InvalidNumericField { .. } => "invalid_numeric_field",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<serde_json::Value>,
}

/// One series of an instant vector
///
/// `metric` is `None` when the key is absent, which decodes as an empty label
/// set. `value` is `[timestamp, "count"]`.
#[derive(Debug, Default, Deserialize)]
struct Series {
    #[serde(default)]
    metric: Option<HashMap<String, String>>,
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

impl Series {
    fn label(&self, name: &str) -> &str {
        self.metric
            .as_ref()
            .and_then(|labels| labels.get(name))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The sample value, `value[1]`, as raw text
    fn sample(&self) -> String {
        match self.value.get(1) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

fn parse_field<T>(field: &'static str, raw: &str) -> Result<T, DecodeError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    raw.parse().map_err(|source| DecodeError::InvalidNumericField {
        field,
        value: raw.to_string(),
        source,
    })
}

/// Decode the body of a `topk(1, ...)` instant query
///
/// Returns `Ok(None)` when Prometheus has no series yet, i.e. no FizzBuzz
/// request has been recorded.
///
/// # Errors
///
/// - [`DecodeError::UnexpectedResultShape`] if more than one series came back
/// - [`DecodeError::InvalidNumericField`] if the hit count or one of the
///   `int1`, `int2`, `limit` labels is not an integer
pub fn decode(body: &[u8]) -> Result<Option<TopRequest>, DecodeError> {
    let response: QueryResponse = serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            body_len = body.len(),
            "Prometheus response is not valid JSON, treating it as an empty result"
        );
        QueryResponse::default()
    });

    let mut result = response.data.result;
    match result.len() {
        0 => {
            tracing::debug!("Prometheus returned no series, no requests recorded yet");
            return Ok(None);
        }
        1 => {}
        count => {
            return Err(DecodeError::UnexpectedResultShape {
                count,
                raw: serde_json::Value::Array(result).to_string(),
            });
        }
    }

    // A series object that does not match the expected shape decodes as empty,
    // which then fails on the hit count below.
    let series: Series = result
        .pop()
        .and_then(|raw| serde_json::from_value(raw).ok())
        .unwrap_or_default();

    let hits: u64 = parse_field(HIT_COUNT_FIELD, &series.sample())?;
    let divisor_a: i64 = parse_field("int1", series.label("int1"))?;
    let divisor_b: i64 = parse_field("int2", series.label("int2"))?;
    let limit: i64 = parse_field("limit", series.label("limit"))?;

    let params = FizzBuzzParams::new(
        divisor_a,
        divisor_b,
        limit,
        series.label("str1"),
        series.label("str2"),
    );

    Ok(Some(TopRequest { params, hits }))
}
