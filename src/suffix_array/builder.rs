//! Suffix array builder
//!
//! Builds a suffix array over one or more strings by:
//! 1. Concatenating all strings with unique sentinel separators
//! 2. Sorting every starting position by the suffix it denotes
//!
//! This is a plain comparison sort, adequate for short text fields such as
//! subject lines. Large inputs are sorted in parallel.

use super::bwt::BwtArray;
use super::lcp::LcpArray;
use super::types::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt::Write;

/// Sequences longer than this are sorted with rayon
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Builder for constructing suffix arrays from strings
#[derive(Debug, Default)]
pub struct SuffixArrayBuilder {
    sequence: ConcatenatedSequence,
}

impl SuffixArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source string, returning its source index
    pub fn add_string(&mut self, s: &str) -> SourceIndex {
        self.sequence.push_source(s)
    }

    /// Number of strings added
    pub fn source_count(&self) -> usize {
        self.sequence.source_count()
    }

    /// Current length of the concatenated sequence
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Sort all suffixes of the accumulated sequence
    pub fn build(self) -> SuffixArrayIndex {
        let suffix_array = build_suffix_array(self.sequence.symbols());
        SuffixArrayIndex {
            sequence: self.sequence,
            suffix_array,
        }
    }
}

/// A concatenated sequence together with its sorted suffix order
#[derive(Debug, Clone)]
pub struct SuffixArrayIndex {
    sequence: ConcatenatedSequence,
    suffix_array: Vec<Position>,
}

impl SuffixArrayIndex {
    /// Build the index for a list of strings
    pub fn from_strings<S: AsRef<str>>(strings: &[S]) -> Self {
        let sequence = ConcatenatedSequence::from_strings(strings);
        let suffix_array = build_suffix_array(sequence.symbols());
        Self {
            sequence,
            suffix_array,
        }
    }

    pub fn sequence(&self) -> &ConcatenatedSequence {
        &self.sequence
    }

    /// Suffix start positions in lexicographic order
    pub fn suffix_array(&self) -> &[Position] {
        &self.suffix_array
    }

    pub fn len(&self) -> usize {
        self.suffix_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffix_array.is_empty()
    }

    /// Inverse permutation: rank of the suffix starting at each position
    pub fn ranks(&self) -> Vec<Rank> {
        let mut ranks = vec![0; self.suffix_array.len()];
        for (rank, &pos) in self.suffix_array.iter().enumerate() {
            ranks[pos] = rank;
        }
        ranks
    }

    /// Source string of the suffix at each rank
    pub fn suffix_types(&self) -> Vec<SourceIndex> {
        self.suffix_array
            .iter()
            .map(|&pos| self.sequence.source_of(pos))
            .collect()
    }

    pub fn lcp_array(&self) -> LcpArray {
        LcpArray::compute(self.sequence.symbols(), &self.suffix_array)
    }

    pub fn bwt_array(&self) -> BwtArray {
        BwtArray::compute(self.sequence.symbols(), &self.suffix_array)
    }

    /// Render the sorted suffixes with their LCP values, one per line
    pub fn describe(&self, lcp: &LcpArray) -> String {
        let symbols = self.sequence.symbols();
        let mut out = String::from("SA\tLCP\tSuffix\n");
        for (rank, &pos) in self.suffix_array.iter().enumerate() {
            let lcp_value = lcp
                .get(rank)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let suffix: String = symbols[pos..].iter().map(|s| s.to_string()).collect();
            let _ = writeln!(out, "{}\t{}\t{}", pos, lcp_value, suffix);
        }
        out
    }
}

/// Sort all suffix start positions
///
/// Time: O(n log n) comparisons, each O(n) worst case
fn build_suffix_array(symbols: &[Symbol]) -> Vec<Position> {
    let n = symbols.len();
    let mut sa: Vec<Position> = (0..n).collect();

    if n > PARALLEL_SORT_THRESHOLD {
        sa.par_sort_unstable_by(|&a, &b| compare_suffixes(symbols, a, b));
    } else {
        sa.sort_unstable_by(|&a, &b| compare_suffixes(symbols, a, b));
    }

    sa
}

/// Compare two suffixes lexicographically
///
/// Sentinels are unique, so two distinct suffixes always differ at or
/// before the first sentinel either of them reaches.
#[inline]
fn compare_suffixes(symbols: &[Symbol], a: Position, b: Position) -> Ordering {
    symbols[a..].cmp(&symbols[b..])
}
