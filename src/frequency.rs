use std::io::Read;

use log::debug;

use crate::bit_io::BitSource;
use crate::error::{GrinError, Result};
use crate::symbol::{SYMBOL_COUNT, Symbol};

/// Occurrence counts over the 9-bit alphabet.
///
/// The end-of-stream slot is always at least 1, so it always gets a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// A table holding only the end-of-stream baseline.
    pub fn new() -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        counts[Symbol::EOS.index()] = 1;
        FrequencyTable { counts }
    }

    pub fn from_counts(counts: [u64; SYMBOL_COUNT]) -> Result<Self> {
        if counts[Symbol::EOS.index()] == 0 {
            return Err(GrinError::Usage(
                "frequency table has no end-of-stream entry".to_string(),
            ));
        }
        if counts.iter().try_fold(0u64, |acc, &c| acc.checked_add(c)).is_none() {
            return Err(GrinError::Usage(
                "frequency counts overflow a 64-bit total".to_string(),
            ));
        }
        Ok(FrequencyTable { counts })
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes.iter().copied().fold(FrequencyTable::new(), |mut table, byte| {
            table.record(byte);
            table
        })
    }

    /// Consumes `source` to the end, counting each 8-bit unit.
    ///
    /// The source is left exhausted; rewinding or closing it is up to the caller.
    pub fn from_source<R: Read>(source: &mut BitSource<R>) -> Result<Self> {
        let mut table = FrequencyTable::new();
        let mut total = 0u64;
        while let Some(byte) = source.read_byte()? {
            table.record(byte);
            total += 1;
        }
        debug!("counted {} bytes, {} distinct symbols", total, table.len());
        Ok(table)
    }

    fn record(&mut self, byte: u8) {
        self.counts[Symbol::from(byte).index()] += 1;
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Symbols with a nonzero count, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        Symbol::all()
            .map(|s| (s, self.counts[s.index()]))
            .filter(|&(_, count)| count > 0)
    }

    /// Number of distinct symbols present, end-of-stream included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Never true: the end-of-stream entry is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of all counts; construction guarantees it fits in a `u64`.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
