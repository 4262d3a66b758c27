//! Normalized longest-common-substring distance
//!
//! `d = 1 - |lcs| / max(|s1|, |s2|)`, measured in characters. `d = 0` for
//! identical strings, `d = 1` when the strings share no character.

use super::common::longest_common_substrings;

/// Distance between two strings in `[0, 1]`
///
/// `lcs` may carry a precomputed longest common substring of the pair; when
/// absent it is computed here. Two empty strings are at distance 0. A
/// precomputed value longer than both strings clamps to 0.
pub fn distance(s1: &str, s2: &str, lcs: Option<&str>) -> f64 {
    let max_length = s1.chars().count().max(s2.chars().count());
    if max_length == 0 {
        return 0.0;
    }

    let lcs_length = match lcs {
        Some(lcs) => lcs.chars().count(),
        None => longest_common_substrings(&[s1, s2]).length,
    };

    (1.0 - lcs_length as f64 / max_length as f64).clamp(0.0, 1.0)
}

/// Distance using the first entry of a cached substring list
///
/// An empty list stands for "no common substring".
pub fn distance_from_substrings(s1: &str, s2: &str, substrings: &[String]) -> f64 {
    let lcs = substrings.first().map(String::as_str).unwrap_or("");
    distance(s1, s2, Some(lcs))
}
