//! Generalized FizzBuzz sequence generation
//!
//! Replaces every index divisible by `int1` with `str1`, every index divisible
//! by `int2` with `str2`, and indices divisible by both with the concatenation.

use serde::{Deserialize, Serialize};

/// Upper bound on up-front allocation when collecting a sequence.
///
/// Limits can reach `i32::MAX`; the vector grows past this on demand.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Parameters of a single FizzBuzz computation
///
/// Field names on the wire (query string, JSON, metric labels) are
/// `int1`, `int2`, `limit`, `str1` and `str2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FizzBuzzParams {
    #[serde(rename = "int1")]
    pub divisor_a: i64,
    #[serde(rename = "int2")]
    pub divisor_b: i64,
    pub limit: i64,
    #[serde(rename = "str1")]
    pub token_a: String,
    #[serde(rename = "str2")]
    pub token_b: String,
}

impl FizzBuzzParams {
    /// Create a new parameter set
    pub fn new(
        divisor_a: i64,
        divisor_b: i64,
        limit: i64,
        token_a: impl Into<String>,
        token_b: impl Into<String>,
    ) -> Self {
        Self {
            divisor_a,
            divisor_b,
            limit,
            token_a: token_a.into(),
            token_b: token_b.into(),
        }
    }

    /// Stringified label values in `int1, int2, limit, str1, str2` order
    pub fn label_values(&self) -> [String; 5] {
        [
            self.divisor_a.to_string(),
            self.divisor_b.to_string(),
            self.limit.to_string(),
            self.token_a.clone(),
            self.token_b.clone(),
        ]
    }

    /// Output token for the 1-based index `i`
    fn token_for(&self, i: i64) -> String {
        match (divides(self.divisor_a, i), divides(self.divisor_b, i)) {
            (true, true) => format!("{}{}", self.token_a, self.token_b),
            (true, false) => self.token_a.clone(),
            (false, true) => self.token_b.clone(),
            (false, false) => i.to_string(),
        }
    }
}

/// `i % divisor == 0` with host remainder semantics.
///
/// A zero divisor never matches.
fn divides(divisor: i64, i: i64) -> bool {
    i.checked_rem(divisor) == Some(0)
}

/// Lazily yield the sequence for `params`, index 1 through `limit`
///
/// Yields nothing when `limit <= 0`.
pub fn sequence(params: &FizzBuzzParams) -> impl Iterator<Item = String> + '_ {
    (1..=params.limit).map(move |i| params.token_for(i))
}

/// Owning form of [`sequence`], for consumers that outlive the borrow
pub fn into_sequence(params: FizzBuzzParams) -> impl Iterator<Item = String> + Send + 'static {
    (1..=params.limit).map(move |i| params.token_for(i))
}

/// Compute the full sequence for `params`
///
/// # Examples
///
/// ```
/// use fizzbuzz_stats::fizzbuzz::{generate, FizzBuzzParams};
///
/// let params = FizzBuzzParams::new(2, 3, 6, "fizz", "buzz");
/// assert_eq!(generate(&params), ["1", "fizz", "buzz", "fizz", "5", "fizzbuzz"]);
/// ```
pub fn generate(params: &FizzBuzzParams) -> Vec<String> {
    tracing::debug!(
        int1 = params.divisor_a,
        int2 = params.divisor_b,
        limit = params.limit,
        str1 = %params.token_a,
        str2 = %params.token_b,
        "Computing FizzBuzz"
    );

    let capacity = usize::try_from(params.limit)
        .unwrap_or(0)
        .min(MAX_PREALLOCATED);
    let mut result = Vec::with_capacity(capacity);
    result.extend(sequence(params));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_classic_parameters() {
        let params = FizzBuzzParams::new(2, 3, 10, "fizz", "buzz");
        assert_eq!(
            generate(&params),
            vec!["1", "fizz", "buzz", "fizz", "5", "fizzbuzz", "7", "fizz", "buzz", "fizz"]
        );
    }

    #[test]
    fn test_generate_zero_limit_is_empty() {
        let params = FizzBuzzParams::new(2, 3, 0, "fizz", "buzz");
        assert!(generate(&params).is_empty());
    }

    #[test]
    fn test_generate_negative_limit_is_empty() {
        let params = FizzBuzzParams::new(2, 3, -5, "fizz", "buzz");
        assert!(generate(&params).is_empty());
    }

    #[test]
    fn test_generate_negative_divisor_matches_like_positive() {
        let params = FizzBuzzParams::new(-2, 3, 6, "abc", "123");
        assert_eq!(
            generate(&params),
            vec!["1", "abc", "123", "abc", "5", "abc123"]
        );
    }

    #[test]
    fn test_generate_equal_divisors_always_concatenate() {
        let params = FizzBuzzParams::new(2, 2, 10, "foo", "bar");
        assert_eq!(
            generate(&params),
            vec!["1", "foobar", "3", "foobar", "5", "foobar", "7", "foobar", "9", "foobar"]
        );
    }

    #[test]
    fn test_generate_divisor_one_matches_every_index() {
        let params = FizzBuzzParams::new(1, 4, 5, "x", "y");
        assert_eq!(generate(&params), vec!["x", "x", "x", "xy", "x"]);
    }

    #[test]
    fn test_generate_zero_divisor_never_matches() {
        let params = FizzBuzzParams::new(0, 2, 4, "never", "two");
        assert_eq!(generate(&params), vec!["1", "two", "3", "two"]);
    }

    #[test]
    fn test_sequence_is_lazy_and_matches_generate() {
        let params = FizzBuzzParams::new(3, 5, 15, "Fizz", "Buzz");
        let first_three: Vec<String> = sequence(&params).take(3).collect();
        assert_eq!(first_three, vec!["1", "2", "Fizz"]);
        assert_eq!(sequence(&params).last().as_deref(), Some("FizzBuzz"));
        assert_eq!(sequence(&params).count(), generate(&params).len());
    }

    #[test]
    fn test_into_sequence_matches_borrowed_sequence() {
        let params = FizzBuzzParams::new(3, 5, 30, "Fizz", "Buzz");
        let owned: Vec<String> = into_sequence(params.clone()).collect();
        assert_eq!(owned, sequence(&params).collect::<Vec<_>>());
    }

    #[test]
    fn test_label_values_order() {
        let params = FizzBuzzParams::new(2, 30, 100, "fizz", "oo");
        assert_eq!(params.label_values(), ["2", "30", "100", "fizz", "oo"]);
    }

    #[test]
    fn test_params_serialize_with_wire_names() {
        let params = FizzBuzzParams::new(2, 30, 100, "fizz", "oo");
        let json = serde_json::to_value(&params).expect("params should serialize");
        assert_eq!(
            json,
            serde_json::json!({"int1": 2, "int2": 30, "limit": 100, "str1": "fizz", "str2": "oo"})
        );
    }
}
