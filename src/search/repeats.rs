//! Supermaximal repeats
//!
//! A plateau in the LCP array (a run of equal values bounded by strictly
//! smaller neighbours) delimits a group of suffixes sharing a prefix that
//! cannot be extended to the right. The repeat is supermaximal when no
//! two of those suffixes are preceded by the same symbol, so it cannot be
//! extended to the left either.

use crate::suffix_array::{BwtArray, LcpArray, Rank, SourceIndex, SuffixArrayIndex};
use ahash::AHashSet;
use serde::Serialize;
use std::ops::RangeInclusive;

/// A repeat found by the plateau scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupermaximalRepeat {
    /// Ranks of the occurrences in suffix-array order
    pub ranks: RangeInclusive<Rank>,
    /// Number of distinct source strings the occurrences come from
    pub source_count: usize,
    /// The repeated text
    pub text: String,
}

impl SupermaximalRepeat {
    /// Number of occurrences
    pub fn occurrences(&self) -> usize {
        self.ranks.end() - self.ranks.start() + 1
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Find all supermaximal repeats across the given strings
pub fn supermaximal_repeats<S: AsRef<str>>(strings: &[S]) -> Vec<SupermaximalRepeat> {
    if strings.is_empty() {
        return Vec::new();
    }
    let index = SuffixArrayIndex::from_strings(strings);
    SupermaximalRepeatFinder::new(&index).scan()
}

/// Plateau scanner over a prebuilt index
pub struct SupermaximalRepeatFinder<'a> {
    index: &'a SuffixArrayIndex,
    lcp: LcpArray,
    bwt: BwtArray,
    types: Vec<SourceIndex>,
}

impl<'a> SupermaximalRepeatFinder<'a> {
    pub fn new(index: &'a SuffixArrayIndex) -> Self {
        Self {
            index,
            lcp: index.lcp_array(),
            bwt: index.bwt_array(),
            types: index.suffix_types(),
        }
    }

    pub fn scan(&self) -> Vec<SupermaximalRepeat> {
        let k = self.index.sequence().source_count();
        let lcp = self.lcp.as_slice();
        let m = lcp.len();
        let mut repeats = Vec::new();

        // Ranks below k are sentinel suffixes; lcp[k - 1] is always zero
        let mut begin: Rank = k.max(1);

        while begin < m {
            // A plateau starts where the LCP rises
            if lcp[begin - 1] >= lcp[begin] {
                begin += 1;
                continue;
            }

            let value = lcp[begin];
            let mut end = begin + 1;
            while end < m && lcp[end] == value {
                end += 1;
            }

            // Right edge must fall (or the array ends) for a local maximum
            if end == m || lcp[end] < value {
                if let Some(repeat) = self.check_plateau(begin, end, value) {
                    log::trace!(
                        "supermaximal repeat {:?} at ranks {}..={}",
                        repeat.text,
                        begin,
                        end
                    );
                    repeats.push(repeat);
                }
            }

            begin = end;
        }

        repeats
    }

    /// Accept the window when every occurrence has a distinct left symbol
    fn check_plateau(&self, begin: Rank, end: Rank, length: usize) -> Option<SupermaximalRepeat> {
        let mut preceding = AHashSet::with_capacity(end - begin + 1);
        for rank in begin..=end {
            if !preceding.insert(self.bwt.as_slice()[rank]) {
                return None;
            }
        }

        let sources: AHashSet<SourceIndex> = self.types[begin..=end].iter().copied().collect();
        let pos = self.index.suffix_array()[begin];

        Some(SupermaximalRepeat {
            ranks: begin..=end,
            source_count: sources.len(),
            text: self.index.sequence().text(pos, length),
        })
    }
}
