//! Character frequency counting.
//!
//! Counts are stored as `f64` because every consumer feeds them straight
//! into floating-point formulas.

use std::collections::HashMap;

/// Occurrences of each character in a sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlphabetCount {
    counts: HashMap<char, f64>,
}

impl AlphabetCount {
    /// Returns the count for a character, or 0.0 if it never occurs.
    pub fn get(&self, symbol: char) -> f64 {
        self.counts.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Sum of `get` over several characters.
    pub fn sum_of(&self, symbols: &[char]) -> f64 {
        symbols.iter().map(|&c| self.get(c)).sum()
    }

    /// Total number of counted characters.
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Number of distinct characters.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over (character, count) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }
}

impl FromIterator<char> for AlphabetCount {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for c in iter {
            *counts.entry(c).or_insert(0.0) += 1.0;
        }
        Self { counts }
    }
}

/// Counts every character of `sequence`.
pub fn count(sequence: &str) -> AlphabetCount {
    sequence.chars().collect()
}
