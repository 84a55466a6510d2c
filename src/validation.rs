//! Preconditions checked before any row is diffed

use crate::error::{Result, TableSide, TablediffError};
use crate::model::{Header, KeyColumns};
use std::collections::HashSet;

/// Both tables must have the same column names in the same order
pub fn assert_headers_match(left: &Header, right: &Header) -> Result<()> {
    if left != right {
        return Err(TablediffError::HeaderMismatch {
            left: left.columns().to_vec(),
            right: right.columns().to_vec(),
        });
    }
    Ok(())
}

/// Column names must be unique within one header
pub fn assert_unique_columns(header: &Header, table: TableSide) -> Result<()> {
    let mut seen = HashSet::with_capacity(header.len());
    for column in header.columns() {
        if !seen.insert(column.as_str()) {
            return Err(TablediffError::DuplicateColumn {
                table,
                column: column.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve key column names against the header
pub fn assert_key_columns_exist(header: &Header, key_columns: &[String]) -> Result<KeyColumns> {
    if key_columns.is_empty() {
        return Err(TablediffError::config("at least one key column is required"));
    }

    let mut positions = Vec::with_capacity(key_columns.len());
    for name in key_columns {
        let pos = header
            .position(name)
            .ok_or_else(|| TablediffError::UnknownKeyColumn {
                column: name.clone(),
                available: header.columns().to_vec(),
            })?;
        if positions.contains(&pos) {
            return Err(TablediffError::config(format!(
                "key column '{}' is listed more than once",
                name
            )));
        }
        positions.push(pos);
    }

    Ok(KeyColumns::from_resolved(
        key_columns.to_vec(),
        positions,
        header.len(),
    ))
}

/// A table that yielded no rows cannot be diffed
pub fn assert_non_empty(table: TableSide, row_count: u64) -> Result<()> {
    if row_count == 0 {
        return Err(TablediffError::EmptyTable { table });
    }
    Ok(())
}

/// Every row must carry exactly one cell per header column
pub fn assert_row_shape(row: &[String], header: &Header, table: TableSide, row_number: u64) -> Result<()> {
    if row.len() != header.len() {
        return Err(TablediffError::MalformedRow {
            table,
            row: row_number,
            expected: header.len(),
            found: row.len(),
        });
    }
    Ok(())
}
