//! Substring search over generalized suffix arrays
//!
//! - `common`: Longest substrings shared by all inputs
//! - `repeats`: Supermaximal repeats across inputs
//! - `distance`: Normalized distance built on the longest common substring

pub mod common;
pub mod distance;
pub mod repeats;

pub use common::{
    CommonSubstringFinder, CommonSubstrings, common_substrings, longest_common_substrings,
};
pub use distance::{distance, distance_from_substrings};
pub use repeats::{SupermaximalRepeat, SupermaximalRepeatFinder, supermaximal_repeats};
