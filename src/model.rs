//! Row, key and diff-entry types shared by the diff engine and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row of string cells, one per header column
pub type Row = Vec<String>;

/// Ordered column names of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by exact (case-sensitive) name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Header extended with one trailing column
    pub fn with_trailing(&self, name: &str) -> Header {
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        Header { columns }
    }
}

/// Identity of a row: the cell values at the key column positions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(Vec<String>);

impl Key {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Key column names resolved to positions in a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    names: Vec<String>,
    positions: Vec<usize>,
    is_key: Vec<bool>,
}

impl KeyColumns {
    /// Built by `validation::assert_key_columns_exist`, which guarantees every
    /// position is inside the header.
    pub(crate) fn from_resolved(names: Vec<String>, positions: Vec<usize>, width: usize) -> Self {
        let mut is_key = vec![false; width];
        for &pos in &positions {
            is_key[pos] = true;
        }
        Self {
            names,
            positions,
            is_key,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn is_key_position(&self, position: usize) -> bool {
        self.is_key.get(position).copied().unwrap_or(false)
    }

    /// Extract the key of a row already checked against the header width
    pub fn extract(&self, row: &[String]) -> Key {
        Key(self.positions.iter().map(|&pos| row[pos].clone()).collect())
    }
}

/// Classification of one logical row across both tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Unchanged,
    Changed,
    Added,
    Removed,
}

impl RowStatus {
    pub const ALL: [RowStatus; 4] = [
        RowStatus::Unchanged,
        RowStatus::Changed,
        RowStatus::Added,
        RowStatus::Removed,
    ];

    /// Text written into the mark column; unchanged rows carry no mark
    pub fn mark(&self) -> &'static str {
        match self {
            RowStatus::Unchanged => "",
            RowStatus::Changed => "CHANGED",
            RowStatus::Added => "ADDED",
            RowStatus::Removed => "REMOVED",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Unchanged => "UNCHANGED",
            other => other.mark(),
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column comparison result of a changed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellStatus {
    Same,
    Different,
}

/// One classified outcome for a single logical entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub status: RowStatus,
    pub key: Key,
    /// Table 1's row, or table 2's row for added entries
    pub row: Row,
    /// Table 2's row of a changed entry when change details were requested
    pub new_row: Option<Row>,
    /// One status per header column; key columns are always `Same`
    pub cells: Option<Vec<CellStatus>>,
}

impl DiffEntry {
    pub fn unchanged(key: Key, row: Row) -> Self {
        Self::plain(RowStatus::Unchanged, key, row)
    }

    pub fn added(key: Key, row: Row) -> Self {
        Self::plain(RowStatus::Added, key, row)
    }

    pub fn removed(key: Key, row: Row) -> Self {
        Self::plain(RowStatus::Removed, key, row)
    }

    pub fn changed(key: Key, row: Row, detail: Option<(Row, Vec<CellStatus>)>) -> Self {
        let (new_row, cells) = match detail {
            Some((new_row, cells)) => (Some(new_row), Some(cells)),
            None => (None, None),
        };
        Self {
            status: RowStatus::Changed,
            key,
            row,
            new_row,
            cells,
        }
    }

    fn plain(status: RowStatus, key: Key, row: Row) -> Self {
        Self {
            status,
            key,
            row,
            new_row: None,
            cells: None,
        }
    }

    /// Names of the columns that differ, when change details are available
    pub fn changed_columns<'h>(&self, header: &'h Header) -> Vec<&'h str> {
        match &self.cells {
            Some(cells) => header
                .columns()
                .iter()
                .zip(cells)
                .filter(|(_, status)| **status == CellStatus::Different)
                .map(|(name, _)| name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }
}
