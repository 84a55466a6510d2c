//! Key lookup over the "new" table with duplicate detection

use crate::error::{Result, TableSide, TablediffError};
use crate::model::{Header, Key, KeyColumns, Row};
use crate::validation::assert_row_shape;
use indexmap::IndexMap;

#[derive(Debug)]
struct Slot {
    row_number: u64,
    row: Option<Row>,
}

/// Arena-style index: slots are emptied on match, never shifted, so lookups
/// and removals stay O(1) and leftovers keep their insertion order.
#[derive(Debug)]
pub struct TableIndex {
    side: TableSide,
    slots: IndexMap<Key, Slot>,
    remaining: usize,
    rows_read: u64,
}

impl TableIndex {
    pub fn new(side: TableSide) -> Self {
        Self {
            side,
            slots: IndexMap::new(),
            remaining: 0,
            rows_read: 0,
        }
    }

    /// Index every row of a table, failing on the first malformed row or repeated key
    pub fn build<I>(side: TableSide, header: &Header, keys: &KeyColumns, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        Self::build_with_progress(side, header, keys, rows, |_| {})
    }

    /// Like `build`, calling `on_row` with the running row count after each insert
    pub fn build_with_progress<I, F>(
        side: TableSide,
        header: &Header,
        keys: &KeyColumns,
        rows: I,
        mut on_row: F,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Row>>,
        F: FnMut(u64),
    {
        let mut index = Self::new(side);
        for row in rows {
            index.insert(header, keys, row?)?;
            on_row(index.rows_read);
        }
        Ok(index)
    }

    /// Add one row; row numbers are 1-based in read order
    pub fn insert(&mut self, header: &Header, keys: &KeyColumns, row: Row) -> Result<()> {
        self.rows_read += 1;
        let row_number = self.rows_read;
        assert_row_shape(&row, header, self.side, row_number)?;

        let key = keys.extract(&row);
        match self.slots.entry(key) {
            indexmap::map::Entry::Occupied(existing) => Err(TablediffError::DuplicateKey {
                table: self.side,
                key: existing.key().values().to_vec(),
                first_row: existing.get().row_number,
                second_row: row_number,
            }),
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(Slot {
                    row_number,
                    row: Some(row),
                });
                self.remaining += 1;
                Ok(())
            }
        }
    }

    /// Remove and return the row stored under `key`, if still unmatched
    pub fn take(&mut self, key: &Key) -> Option<Row> {
        let taken = self.slots.get_mut(key)?.row.take();
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.row.is_some())
    }

    /// Rows indexed so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Rows not yet taken
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unmatched entries in original insertion order
    pub fn into_remaining(self) -> impl Iterator<Item = (Key, Row)> {
        self.slots
            .into_iter()
            .filter_map(|(key, slot)| slot.row.map(|row| (key, row)))
    }
}
