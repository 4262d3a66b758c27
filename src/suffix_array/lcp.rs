//! Longest-common-prefix array
//!
//! Entry `i` holds the shared-prefix length of the suffixes ranked `i` and
//! `i + 1`, so an array over `n` suffixes has `n - 1` entries.

use super::types::{Position, Rank, Symbol};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcpArray {
    values: Vec<usize>,
}

impl LcpArray {
    /// Compute the LCP array from a sequence and its suffix array
    ///
    /// Positions are visited in text order. The prefix shared by position
    /// `i` and its rank successor is at least the value found for `i - 1`
    /// minus one, so each comparison resumes from that bound. Total work is
    /// O(n) on top of the sort.
    pub fn compute(symbols: &[Symbol], suffix_array: &[Position]) -> Self {
        let n = symbols.len();
        if n == 0 {
            return Self::default();
        }

        let mut rank: Vec<Rank> = vec![0; n];
        for (r, &pos) in suffix_array.iter().enumerate() {
            rank[pos] = r;
        }

        let mut values = vec![0; n - 1];
        let mut h = 0usize;

        for pos in 0..n {
            let r = rank[pos];

            // Last in rank order: no successor, and no bound to carry
            if r + 1 == n {
                h = 0;
                continue;
            }

            let next = suffix_array[r + 1];
            while pos + h < n && next + h < n && symbols[pos + h] == symbols[next + h] {
                h += 1;
            }
            values[r] = h;
            h = h.saturating_sub(1);
        }

        Self { values }
    }

    pub fn get(&self, rank: Rank) -> Option<usize> {
        self.values.get(rank).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter().copied()
    }
}

impl std::ops::Index<Rank> for LcpArray {
    type Output = usize;

    fn index(&self, rank: Rank) -> &usize {
        &self.values[rank]
    }
}
