//! Types for generalized suffix array indexing
//!
//! Several source strings are concatenated into one symbol sequence, each
//! followed by its own sentinel. Sentinels are unique per source and order
//! below every real character, so no shared prefix can ever cross a source
//! boundary.

use std::fmt;

/// Index of a source string within a concatenated sequence
pub type SourceIndex = usize;

/// Rank of a suffix in suffix-array order
pub type Rank = usize;

/// Position in the concatenated sequence
pub type Position = usize;

/// One element of a concatenated sequence
///
/// The derived ordering compares variants first, so every `Sentinel`
/// sorts before every `Char`, and sentinels order by source index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Terminator of the source string with this index
    Sentinel(u32),
    /// A real character
    Char(char),
}

impl Symbol {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Symbol::Sentinel(_))
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(*c),
            Symbol::Sentinel(_) => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::Sentinel(i) => write!(f, "${}", i),
        }
    }
}

/// Location of one source string in the concatenated sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceBoundary {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive, this is where the sentinel sits)
    pub end: Position,
}

impl SourceBoundary {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sentinel-separated concatenation of one or more source strings
///
/// Length is the total character count plus one sentinel per source.
#[derive(Debug, Clone, Default)]
pub struct ConcatenatedSequence {
    symbols: Vec<Symbol>,
    boundaries: Vec<SourceBoundary>,
}

impl ConcatenatedSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate all strings, each followed by its own sentinel
    pub fn from_strings<S: AsRef<str>>(strings: &[S]) -> Self {
        let capacity = strings.iter().map(|s| s.as_ref().len() + 1).sum();
        let mut seq = Self {
            symbols: Vec::with_capacity(capacity),
            boundaries: Vec::with_capacity(strings.len()),
        };
        for s in strings {
            seq.push_source(s.as_ref());
        }
        seq
    }

    /// Append a source string and its sentinel, returning the source index
    pub fn push_source(&mut self, s: &str) -> SourceIndex {
        let index = self.boundaries.len();
        let start = self.symbols.len();
        self.symbols.extend(s.chars().map(Symbol::Char));
        let end = self.symbols.len();
        self.symbols.push(Symbol::Sentinel(index as u32));
        self.boundaries.push(SourceBoundary { start, end });
        index
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn boundaries(&self) -> &[SourceBoundary] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of source strings
    pub fn source_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Source string a position belongs to (a sentinel belongs to the
    /// string it terminates)
    pub fn source_of(&self, pos: Position) -> SourceIndex {
        self.boundaries.partition_point(|b| b.end < pos)
    }

    /// Number of real characters from `pos` up to the next sentinel
    pub fn remaining_in_source(&self, pos: Position) -> usize {
        let source = self.source_of(pos);
        self.boundaries[source].end.saturating_sub(pos)
    }

    /// Render `len` symbols starting at `pos` as a string
    ///
    /// Sentinels are never part of a shared prefix, so callers only ask
    /// for character runs; any sentinel encountered is skipped.
    pub fn text(&self, pos: Position, len: usize) -> String {
        let end = (pos + len).min(self.symbols.len());
        self.symbols[pos..end]
            .iter()
            .filter_map(Symbol::as_char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_sort_below_chars() {
        assert!(Symbol::Sentinel(5) < Symbol::Char('\0'));
        assert!(Symbol::Sentinel(0) < Symbol::Sentinel(1));
        assert!(Symbol::Char('a') < Symbol::Char('b'));
    }

    #[test]
    fn test_concatenation_layout() {
        let seq = ConcatenatedSequence::from_strings(&["ab", "", "cde"]);

        // 2 + 0 + 3 characters plus three sentinels
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.source_count(), 3);
        assert_eq!(seq.symbols()[2], Symbol::Sentinel(0));
        assert_eq!(seq.symbols()[3], Symbol::Sentinel(1));
        assert_eq!(seq.symbols()[7], Symbol::Sentinel(2));

        assert_eq!(seq.boundaries()[1], SourceBoundary { start: 3, end: 3 });
        assert!(seq.boundaries()[1].is_empty());
        assert_eq!(seq.boundaries()[2].len(), 3);
    }

    #[test]
    fn test_source_of() {
        let seq = ConcatenatedSequence::from_strings(&["ab", "cd"]);
        // a b $0 c d $1
        let sources: Vec<_> = (0..seq.len()).map(|p| seq.source_of(p)).collect();
        assert_eq!(sources, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_remaining_and_text() {
        let seq = ConcatenatedSequence::from_strings(&["hello", "world"]);
        assert_eq!(seq.remaining_in_source(0), 5);
        assert_eq!(seq.remaining_in_source(3), 2);
        assert_eq!(seq.remaining_in_source(5), 0);
        assert_eq!(seq.remaining_in_source(6), 5);
        assert_eq!(seq.text(1, 3), "ell");
        assert_eq!(seq.text(6, 5), "world");
    }

    #[test]
    fn test_unicode_is_per_char() {
        let seq = ConcatenatedSequence::from_strings(&["héllo"]);
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.text(1, 1), "é");
    }
}
