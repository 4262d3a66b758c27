//! Generalized suffix array module
//!
//! Indexes one or more strings at once so that substrings shared across
//! them can be found with linear scans over rank order.
//!
//! ## Architecture
//!
//! - `types`: Symbols, sentinels and the concatenated sequence
//! - `builder`: Sorts suffixes into a suffix array
//! - `lcp`: Longest-common-prefix lengths between rank neighbours
//! - `bwt`: Preceding symbol of every ranked suffix

pub mod builder;
pub mod bwt;
pub mod lcp;
pub mod types;

// Re-exports for convenience
pub use builder::{SuffixArrayBuilder, SuffixArrayIndex};
pub use bwt::BwtArray;
pub use lcp::LcpArray;
pub use types::{ConcatenatedSequence, Position, Rank, SourceBoundary, SourceIndex, Symbol};
