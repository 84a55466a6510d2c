//! Table sources: anything that yields a header and a forward-only row stream

use crate::error::{Result, TablediffError};
use crate::model::{Header, Row};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Forward-only stream of rows in source order
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

/// An opened table
pub struct Table {
    pub header: Header,
    pub rows: RowStream,
}

impl Table {
    pub fn new(header: Header, rows: RowStream) -> Self {
        Self { header, rows }
    }

    /// Fully materialize the rows (used by `show` and tests)
    pub fn collect_rows(self) -> Result<(Header, Vec<Row>)> {
        let rows = self.rows.collect::<Result<Vec<_>>>()?;
        Ok((self.header, rows))
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("header", &self.header).finish_non_exhaustive()
    }
}

pub trait TableSource {
    /// Human-readable location used in log lines and errors
    fn location(&self) -> String;

    /// Open the table, optionally selecting a named sheet
    fn open(&self, sheet: Option<&str>) -> Result<Table>;
}

/// In-memory tables, optionally organised as named sheets
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    sheets: Vec<(String, Header, Vec<Row>)>,
}

impl MemorySource {
    pub fn new(header: Header, rows: Vec<Row>) -> Self {
        Self {
            name: "memory".to_string(),
            sheets: vec![(String::new(), header, rows)],
        }
    }

    /// Convenience constructor from string slices
    pub fn from_slices(header: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            Header::new(header.iter().copied()),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a named sheet; the first sheet stays the default
    pub fn with_sheet(mut self, sheet: impl Into<String>, header: Header, rows: Vec<Row>) -> Self {
        self.sheets.push((sheet.into(), header, rows));
        self
    }
}

impl TableSource for MemorySource {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn open(&self, sheet: Option<&str>) -> Result<Table> {
        let found = match sheet {
            None => self.sheets.first(),
            Some(wanted) => self.sheets.iter().find(|(name, _, _)| name == wanted),
        };
        let (_, header, rows) = found.ok_or_else(|| {
            TablediffError::source_not_found(format!(
                "{}#{}",
                self.name,
                sheet.unwrap_or_default()
            ))
        })?;
        let rows: RowStream = Box::new(rows.clone().into_iter().map(Ok));
        Ok(Table::new(header.clone(), rows))
    }
}

/// Delimited text file (CSV, TSV)
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self, sheet: Option<&str>) -> Result<Table> {
        if let Some(sheet) = sheet {
            // Delimited files hold exactly one unnamed table
            return Err(TablediffError::source_not_found(format!(
                "{}#{}",
                self.path.display(),
                sheet
            )));
        }
        if !self.path.is_file() {
            return Err(TablediffError::source_not_found(self.path.display().to_string()));
        }

        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(file);

        let header_record = reader
            .headers()
            .map_err(|e| TablediffError::format(&self.path, e.to_string()))?;
        let header = Header::new(header_record.iter());
        log::debug!(
            "Opened '{}' with {} columns",
            self.path.display(),
            header.len()
        );

        let path = self.path.clone();
        let rows: RowStream = Box::new(reader.into_records().map(move |record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Row>())
                .map_err(|e| TablediffError::format(&path, e.to_string()))
        }));
        Ok(Table::new(header, rows))
    }
}

/// Concrete formats recognised from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(u8),
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Delimited(b',')),
            "tsv" | "tab" => Ok(Self::Delimited(b'\t')),
            other => Err(TablediffError::config(format!(
                "unsupported input format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Pick a source for a path; an explicit delimiter forces delimited text
pub fn open_source(path: &Path, delimiter: Option<u8>) -> Result<Box<dyn TableSource>> {
    let format = match delimiter {
        Some(d) => SourceFormat::Delimited(d),
        None => SourceFormat::detect(path)?,
    };
    match format {
        SourceFormat::Delimited(d) => Ok(Box::new(CsvSource::new(path, d))),
    }
}
