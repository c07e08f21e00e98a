//! Deterministic Seeds
//!
//! Every "random" choice in the pipeline comes from here. A seed is the
//! MD5 digest of a string key read as a big-endian 128-bit integer, which
//! is the same number you get by parsing the hex digest in base 16.
//! Not a security boundary.

use chrono::NaiveDate;

/// Map a string key to a stable non-negative integer.
pub fn seed(key: &str) -> u128 {
    let digest = md5::compute(key.as_bytes());
    u128::from_be_bytes(digest.0)
}

/// Order-independent seed for a pair of identifiers.
///
/// The identifiers are sorted lexicographically and joined with `-`
/// before hashing, so `pair_seed(a, b) == pair_seed(b, a)`.
pub fn pair_seed(a: &str, b: &str) -> u128 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    seed(&format!("{}-{}", first, second))
}

/// Seed for one slot of a birthdate's chart: `"{YYYY-MM-DD}-{offset}"`.
pub fn chart_seed(birthdate: NaiveDate, offset: usize) -> u128 {
    seed(&format!("{}-{}", birthdate.format("%Y-%m-%d"), offset))
}
