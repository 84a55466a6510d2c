//! Output assembly: ordering, filtering and marking of diff entries

use crate::config::DiffOptions;
use crate::diff::DiffResult;
use crate::error::Result;
use crate::model::{CellStatus, DiffEntry, Header, RowStatus};
use crate::sink::{RenderHints, TableSink};
use crate::PARALLEL_SORT_THRESHOLD;
use rayon::prelude::*;
use serde::Serialize;

/// One cell as handed to a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedCell {
    pub value: String,
    /// Table 1's value when the cell differs and change details are shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub status: CellStatus,
}

impl EmittedCell {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            previous: None,
            status: CellStatus::Same,
        }
    }
}

/// One row as handed to a sink, already in final order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedRow {
    pub status: RowStatus,
    /// Status to highlight, `None` for unchanged rows and suppressed marks
    pub mark: Option<RowStatus>,
    pub cells: Vec<EmittedCell>,
}

impl EmittedRow {
    pub fn values(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.value.as_str()).collect()
    }
}

/// Applies `DiffOptions` to a classifier result and drives a sink
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    options: DiffOptions,
}

impl OutputAssembler {
    pub fn new(options: DiffOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Header handed to the sink, including the mark column when configured
    pub fn output_header(&self, header: &Header) -> Header {
        match &self.options.mark_column {
            Some(name) => header.with_trailing(name),
            None => header.clone(),
        }
    }

    /// Entries to emit, filtered and ordered; the input is left untouched
    pub fn arrange<'e>(&self, entries: &'e [DiffEntry]) -> Vec<&'e DiffEntry> {
        let mut selected: Vec<&DiffEntry> = entries
            .iter()
            .filter(|e| !(self.options.suppress_unchanged && e.status == RowStatus::Unchanged))
            .collect();

        if self.options.sort_lines {
            // Keys are unique across entries, so the order is total
            if selected.len() >= PARALLEL_SORT_THRESHOLD {
                selected.par_sort_by(|a, b| a.key.cmp(&b.key));
            } else {
                selected.sort_by(|a, b| a.key.cmp(&b.key));
            }
        }
        selected
    }

    pub fn emit_row(&self, entry: &DiffEntry) -> EmittedRow {
        let mark = match entry.status {
            RowStatus::Unchanged => None,
            RowStatus::Added | RowStatus::Removed if self.options.suppress_added_removed_marks => None,
            status => Some(status),
        };

        let mut cells: Vec<EmittedCell> = match (&entry.cells, &entry.new_row) {
            (Some(statuses), Some(new_row)) if self.options.show_change_details => entry
                .row
                .iter()
                .zip(new_row)
                .zip(statuses)
                .map(|((old, new), status)| match status {
                    CellStatus::Different => EmittedCell {
                        value: new.clone(),
                        previous: Some(old.clone()),
                        status: CellStatus::Different,
                    },
                    CellStatus::Same => EmittedCell::plain(old),
                })
                .collect(),
            _ => entry.row.iter().map(|v| EmittedCell::plain(v)).collect(),
        };

        if self.options.mark_column.is_some() {
            cells.push(EmittedCell::plain(mark.map(|s| s.mark()).unwrap_or("")));
        }

        EmittedRow {
            status: entry.status,
            mark,
            cells,
        }
    }

    pub fn hints(&self) -> RenderHints {
        RenderHints {
            colors: !self.options.disable_colors,
            change_details: self.options.show_change_details,
        }
    }

    /// Hand the final row sequence (and optional synthesis) to the sink.
    /// Returns the number of rows written.
    pub fn assemble(&self, result: &DiffResult, sink: &mut dyn TableSink) -> Result<usize> {
        self.options.validate_against(&result.header)?;

        let arranged = self.arrange(&result.entries);
        log::debug!(
            "Emitting {} of {} entries",
            arranged.len(),
            result.entries.len()
        );

        sink.begin(&self.output_header(&result.header), &self.hints())?;
        for entry in &arranged {
            sink.write_row(&self.emit_row(entry))?;
        }
        if self.options.emit_synthesis {
            sink.write_synthesis(&result.synthesis)?;
        }
        sink.finish()?;
        Ok(arranged.len())
    }
}

/// Pretty printer for table information
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the header and size of one table
    pub fn print_table_info(location: &str, header: &Header, row_count: u64) {
        println!("📄 Table: {}", location);
        println!("├─ Rows: {}", row_count);
        println!("└─ Columns: {}", header.len());
        for (i, name) in header.columns().iter().enumerate() {
            let prefix = if i == header.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {}", prefix, name);
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    pub fn format_table_info(location: &str, header: &Header, row_count: u64) -> Result<String> {
        let json = serde_json::json!({
            "location": location,
            "columns": header.columns(),
            "row_count": row_count,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
