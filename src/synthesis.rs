//! Running counts of diff outcomes

use crate::model::{DiffEntry, RowStatus};
use serde::{Deserialize, Serialize};

/// Immutable summary of one diff run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub unchanged: u64,
    pub changed: u64,
    pub added: u64,
    pub removed: u64,
    pub table1_rows: u64,
    pub table2_rows: u64,
}

impl Synthesis {
    pub fn count(&self, status: RowStatus) -> u64 {
        match status {
            RowStatus::Unchanged => self.unchanged,
            RowStatus::Changed => self.changed,
            RowStatus::Added => self.added,
            RowStatus::Removed => self.removed,
        }
    }

    pub fn total_entries(&self) -> u64 {
        self.unchanged + self.changed + self.added + self.removed
    }

    pub fn has_differences(&self) -> bool {
        self.changed + self.added + self.removed > 0
    }

    /// `(status, count)` pairs in a fixed order, for writers
    pub fn rows(&self) -> Vec<(RowStatus, u64)> {
        RowStatus::ALL.iter().map(|&s| (s, self.count(s))).collect()
    }
}

#[derive(Debug, Default)]
pub struct SynthesisAggregator {
    counts: Synthesis,
}

impl SynthesisAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called exactly once per produced entry
    pub fn record(&mut self, entry: &DiffEntry) {
        let counter = match entry.status {
            RowStatus::Unchanged => &mut self.counts.unchanged,
            RowStatus::Changed => &mut self.counts.changed,
            RowStatus::Added => &mut self.counts.added,
            RowStatus::Removed => &mut self.counts.removed,
        };
        *counter += 1;
    }

    pub fn record_table1_row(&mut self) {
        self.counts.table1_rows += 1;
    }

    pub fn set_table2_rows(&mut self, rows: u64) {
        self.counts.table2_rows = rows;
    }

    pub fn snapshot(&self) -> Synthesis {
        self.counts
    }
}
