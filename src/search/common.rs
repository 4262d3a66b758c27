//! Longest common substrings of several strings
//!
//! Single left-to-right scan over suffix-array ranks with a two-pointer
//! window that always holds at least one suffix of every source string.
//! The smallest LCP entry inside the window is the length of the prefix
//! shared by all suffixes in it, hence a substring common to all sources.

use crate::suffix_array::{LcpArray, Rank, SourceIndex, SuffixArrayIndex};
use std::collections::VecDeque;

/// Result of a longest-common-substring scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonSubstrings {
    /// Length in characters of every substring in `substrings`
    pub length: usize,
    /// Distinct substrings of that length, in suffix-array order
    pub substrings: Vec<String>,
}

impl CommonSubstrings {
    /// The first substring, or the empty string if none was found
    pub fn first(&self) -> &str {
        self.substrings.first().map(String::as_str).unwrap_or("")
    }
}

/// Longest substrings occurring in every input string
///
/// If any input is empty the only common substring is `""`. No inputs at
/// all yields an empty result.
pub fn common_substrings<S: AsRef<str>>(strings: &[S]) -> Vec<String> {
    longest_common_substrings(strings).substrings
}

/// Like [`common_substrings`], also reporting the common length
pub fn longest_common_substrings<S: AsRef<str>>(strings: &[S]) -> CommonSubstrings {
    if strings.is_empty() {
        return CommonSubstrings::default();
    }
    if strings.iter().any(|s| s.as_ref().is_empty()) {
        return CommonSubstrings {
            length: 0,
            substrings: vec![String::new()],
        };
    }

    let index = SuffixArrayIndex::from_strings(strings);
    CommonSubstringFinder::new(&index).scan()
}

/// Window scanner over a prebuilt index
pub struct CommonSubstringFinder<'a> {
    index: &'a SuffixArrayIndex,
    lcp: LcpArray,
    types: Vec<SourceIndex>,
}

impl<'a> CommonSubstringFinder<'a> {
    pub fn new(index: &'a SuffixArrayIndex) -> Self {
        Self {
            index,
            lcp: index.lcp_array(),
            types: index.suffix_types(),
        }
    }

    /// Run the window scan
    pub fn scan(&self) -> CommonSubstrings {
        let k = self.index.sequence().source_count();
        let n = self.index.len();

        // The first k ranks are the sentinel-only suffixes
        if k == 0 || n <= k {
            return CommonSubstrings::default();
        }

        let mut window = TypeWindow::new(k);
        let mut minima = WindowMinimum::default();
        let mut best: Option<usize> = None;
        let mut found: Vec<String> = Vec::new();

        let mut begin: Rank = k;
        let mut end: Rank = k;
        window.add(self.types[begin]);

        loop {
            // Grow until every source is represented
            while !window.is_complete() && end + 1 < n {
                end += 1;
                minima.push(end - 1, &self.lcp);
                window.add(self.types[end]);
            }

            // Running out of ranks means no smaller window can complete either
            if !window.is_complete() {
                break;
            }

            let length = self.window_length(begin, &minima);
            log::trace!(
                "lcs window [{}, {}] min lcp {} (best {:?})",
                begin,
                end,
                length,
                best
            );

            match best {
                Some(current) if length < current => {}
                Some(current) if length == current => {
                    let candidate = self.substring_at(begin, length);
                    if !found.contains(&candidate) {
                        found.push(candidate);
                    }
                }
                _ => {
                    best = Some(length);
                    found.clear();
                    found.push(self.substring_at(begin, length));
                }
            }

            // Shrink from the left
            window.remove(self.types[begin]);
            begin += 1;
            if begin >= n {
                break;
            }
            minima.drop_before(begin);
            if begin > end {
                end = begin;
                window.add(self.types[end]);
            }
        }

        CommonSubstrings {
            length: best.unwrap_or(0),
            substrings: found,
        }
    }

    /// Shared prefix length of every suffix in the window
    fn window_length(&self, begin: Rank, minima: &WindowMinimum) -> usize {
        match minima.min(&self.lcp) {
            Some(value) => value,
            // A single-suffix window only happens with one source string
            None => {
                let pos = self.index.suffix_array()[begin];
                self.index.sequence().remaining_in_source(pos)
            }
        }
    }

    fn substring_at(&self, rank: Rank, length: usize) -> String {
        let pos = self.index.suffix_array()[rank];
        self.index.sequence().text(pos, length)
    }
}

/// Per-source counts of the suffixes inside the window
struct TypeWindow {
    counts: Vec<usize>,
    present: usize,
}

impl TypeWindow {
    fn new(sources: usize) -> Self {
        Self {
            counts: vec![0; sources],
            present: 0,
        }
    }

    fn add(&mut self, source: SourceIndex) {
        if self.counts[source] == 0 {
            self.present += 1;
        }
        self.counts[source] += 1;
    }

    fn remove(&mut self, source: SourceIndex) {
        self.counts[source] -= 1;
        if self.counts[source] == 0 {
            self.present -= 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.present == self.counts.len()
    }
}

/// Sliding minimum over LCP entries, kept as a deque of entry indices with
/// strictly increasing values
#[derive(Default)]
struct WindowMinimum {
    entries: VecDeque<Rank>,
}

impl WindowMinimum {
    fn push(&mut self, entry: Rank, lcp: &LcpArray) {
        while let Some(&back) = self.entries.back() {
            if lcp[back] >= lcp[entry] {
                self.entries.pop_back();
            } else {
                break;
            }
        }
        self.entries.push_back(entry);
    }

    /// Entry `j` spans ranks `j` and `j + 1`; it leaves once `begin > j`
    fn drop_before(&mut self, begin: Rank) {
        while let Some(&front) = self.entries.front() {
            if front < begin {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    fn min(&self, lcp: &LcpArray) -> Option<usize> {
        self.entries.front().map(|&j| lcp[j])
    }
}
