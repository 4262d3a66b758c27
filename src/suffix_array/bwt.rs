//! Burrows-Wheeler array
//!
//! For each rank, the symbol immediately preceding that suffix in the
//! concatenated sequence. Only used to decide whether a repeat can be
//! extended to the left.

use super::types::{Position, Rank, Symbol};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BwtArray {
    values: Vec<Option<Symbol>>,
}

impl BwtArray {
    /// `None` marks the suffix starting at position 0
    pub fn compute(symbols: &[Symbol], suffix_array: &[Position]) -> Self {
        let values = suffix_array
            .iter()
            .map(|&pos| pos.checked_sub(1).map(|prev| symbols[prev]))
            .collect();
        Self { values }
    }

    pub fn get(&self, rank: Rank) -> Option<Symbol> {
        self.values.get(rank).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<Symbol>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix_array::SuffixArrayIndex;

    #[test]
    fn test_bwt_banana() {
        let index = SuffixArrayIndex::from_strings(&["banana"]);
        let bwt = index.bwt_array();

        // sa = [6, 5, 3, 1, 0, 4, 2]
        let expected: Vec<Option<Symbol>> = vec![
            Some(Symbol::Char('a')),
            Some(Symbol::Char('n')),
            Some(Symbol::Char('n')),
            Some(Symbol::Char('b')),
            None,
            Some(Symbol::Char('a')),
            Some(Symbol::Char('a')),
        ];
        assert_eq!(bwt.as_slice(), expected.as_slice());
        assert_eq!(bwt.get(4), None);
        assert_eq!(bwt.len(), 7);
    }

    #[test]
    fn test_bwt_sees_previous_sentinel() {
        let index = SuffixArrayIndex::from_strings(&["a", "b"]);
        // a $0 b $1 -> sa = [1, 3, 0, 2]
        let bwt = index.bwt_array();
        assert_eq!(bwt.get(3), Some(Symbol::Sentinel(0)));
    }
}
