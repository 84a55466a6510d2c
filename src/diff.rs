//! Keyed row matching: classifies every row of two tables exactly once

use crate::error::{Result, TableSide, TablediffError};
use crate::index::TableIndex;
use crate::model::{CellStatus, DiffEntry, Header, Key, KeyColumns, Row};
use crate::progress::ProgressReporter;
use crate::source::Table;
use crate::synthesis::{Synthesis, SynthesisAggregator};
use crate::validation::{
    assert_headers_match, assert_key_columns_exist, assert_non_empty, assert_row_shape,
    assert_unique_columns,
};
use crate::PROGRESS_INTERVAL;
use std::collections::HashMap;

/// Unfiltered outcome of a diff run, in classifier order
#[derive(Debug, Clone)]
pub struct DiffResult {
    pub header: Header,
    pub key_columns: KeyColumns,
    pub entries: Vec<DiffEntry>,
    pub synthesis: Synthesis,
}

/// Streams table 1 against an index of table 2
pub struct DiffClassifier {
    show_change_details: bool,
    progress: ProgressReporter,
}

impl DiffClassifier {
    pub fn new(show_change_details: bool) -> Self {
        Self {
            show_change_details,
            progress: ProgressReporter::new_minimal(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Classify every row of `old` (table 1) and `new` (table 2)
    pub fn classify(&mut self, old: Table, new: Table, key_columns: &[String]) -> Result<DiffResult> {
        assert_unique_columns(&old.header, TableSide::Old)?;
        assert_unique_columns(&new.header, TableSide::New)?;
        assert_headers_match(&old.header, &new.header)?;
        let keys = assert_key_columns_exist(&old.header, key_columns)?;
        let header = old.header;

        let mut old_rows = old.rows.peekable();
        if old_rows.peek().is_none() {
            return Err(TablediffError::EmptyTable {
                table: TableSide::Old,
            });
        }

        let index = self.build_index(&header, &keys, new.rows)?;
        assert_non_empty(TableSide::New, index.rows_read())?;
        log::debug!("Indexed {} rows of table 2", index.rows_read());

        let mut aggregator = SynthesisAggregator::new();
        aggregator.set_table2_rows(index.rows_read());
        let entries = self.scan(&header, &keys, old_rows, index, &mut aggregator)?;

        let synthesis = aggregator.snapshot();
        log::info!(
            "Diff complete: {} unchanged, {} changed, {} added, {} removed",
            synthesis.unchanged,
            synthesis.changed,
            synthesis.added,
            synthesis.removed
        );

        Ok(DiffResult {
            header,
            key_columns: keys,
            entries,
            synthesis,
        })
    }

    fn build_index<I>(&mut self, header: &Header, keys: &KeyColumns, rows: I) -> Result<TableIndex>
    where
        I: Iterator<Item = Result<Row>>,
    {
        let progress = &mut self.progress;
        let index = TableIndex::build_with_progress(TableSide::New, header, keys, rows, |read| {
            if read % PROGRESS_INTERVAL == 0 {
                progress.update_index(read);
            }
        })?;
        self.progress
            .finish_index(&format!("Indexed {} rows of table 2", index.rows_read()));
        Ok(index)
    }

    fn scan<I>(
        &mut self,
        header: &Header,
        keys: &KeyColumns,
        old_rows: I,
        mut index: TableIndex,
        aggregator: &mut SynthesisAggregator,
    ) -> Result<Vec<DiffEntry>>
    where
        I: Iterator<Item = Result<Row>>,
    {
        let mut entries = Vec::with_capacity(index.remaining());
        let mut seen: HashMap<Key, u64> = HashMap::new();
        let mut row_number = 0u64;

        for row in old_rows {
            let row = row?;
            row_number += 1;
            aggregator.record_table1_row();
            assert_row_shape(&row, header, TableSide::Old, row_number)?;

            let key = keys.extract(&row);
            if let Some(first_row) = seen.insert(key.clone(), row_number) {
                return Err(TablediffError::DuplicateKey {
                    table: TableSide::Old,
                    key: key.into_values(),
                    first_row,
                    second_row: row_number,
                });
            }

            let entry = match index.take(&key) {
                Some(new_row) => compare_rows(keys, key, row, new_row, self.show_change_details),
                None => DiffEntry::removed(key, row),
            };
            aggregator.record(&entry);
            entries.push(entry);

            if row_number % PROGRESS_INTERVAL == 0 {
                self.progress.update_scan(row_number);
            }
        }

        log::debug!("{} rows of table 2 left unmatched", index.remaining());
        for (key, row) in index.into_remaining() {
            let entry = DiffEntry::added(key, row);
            aggregator.record(&entry);
            entries.push(entry);
        }

        self.progress
            .finish_scan(&format!("Compared {} rows of table 1", row_number));
        Ok(entries)
    }
}

/// Compare two rows sharing a key; key columns are never compared
fn compare_rows(keys: &KeyColumns, key: Key, old: Row, new: Row, details: bool) -> DiffEntry {
    let differs = |i: usize| !keys.is_key_position(i) && old[i] != new[i];

    if !details {
        return if (0..old.len()).any(differs) {
            DiffEntry::changed(key, old, None)
        } else {
            DiffEntry::unchanged(key, old)
        };
    }

    let cells: Vec<CellStatus> = (0..old.len())
        .map(|i| if differs(i) { CellStatus::Different } else { CellStatus::Same })
        .collect();
    if cells.contains(&CellStatus::Different) {
        DiffEntry::changed(key, old, Some((new, cells)))
    } else {
        DiffEntry::unchanged(key, old)
    }
}

/// Run a diff without progress bars
pub fn diff_tables(
    old: Table,
    new: Table,
    key_columns: &[String],
    show_change_details: bool,
) -> Result<DiffResult> {
    DiffClassifier::new(show_change_details).classify(old, new, key_columns)
}
