use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Occurrence counts for each byte value present in an input.
///
/// Entries are kept ordered by symbol so every traversal of the table, and
/// therefore every tree built from it, is the same on both sides of a
/// compress/decompress pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if u32::try_from(data.len()).is_err() {
            return Err(Error::InputTooLarge { len: data.len() });
        }

        let mut table = Self::new();
        for &b in data {
            table.increment(b);
        }

        Ok(table)
    }

    pub fn increment(&mut self, symbol: u8) {
        let count = self.counts.entry(symbol).or_default();
        *count = count.saturating_add(1);
    }

    /// Inserts a stored count. The first entry for a symbol wins, later
    /// duplicates are ignored.
    pub fn add_entry(&mut self, symbol: u8, count: u32) {
        self.counts.entry(symbol).or_insert(count);
    }

    /// (symbol, count) pairs in ascending symbol order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    pub fn count(&self, symbol: u8) -> Option<u32> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the input the table describes.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_bytes() {
        let t = FrequencyTable::from_bytes(b"aaabbc").unwrap();
        assert_eq!(t.count(b'a'), Some(3));
        assert_eq!(t.count(b'b'), Some(2));
        assert_eq!(t.count(b'c'), Some(1));
        assert_eq!(t.count(b'd'), None);
        assert_eq!(t.len(), 3);
        assert_eq!(t.total(), 6);
    }

    #[test]
    fn increment_starts_at_one() {
        let mut t = FrequencyTable::new();
        assert!(t.is_empty());
        t.increment(0xff);
        assert_eq!(t.count(0xff), Some(1));
        t.increment(0xff);
        assert_eq!(t.count(0xff), Some(2));
    }

    #[test]
    fn add_entry_first_write_wins() {
        let mut t = FrequencyTable::new();
        t.add_entry(7, 10);
        t.add_entry(7, 99);
        assert_eq!(t.count(7), Some(10));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn entries_are_sorted_by_symbol() {
        let t = FrequencyTable::from_bytes(&[9, 3, 200, 3, 0]).unwrap();
        let symbols: Vec<u8> = t.entries().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec![0, 3, 9, 200]);
    }
}
