//! Error types for tablediff operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TablediffError>;

/// Which side of the comparison an error or count refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TableSide {
    #[serde(rename = "table1")]
    Old,
    #[serde(rename = "table2")]
    New,
}

impl std::fmt::Display for TableSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableSide::Old => write!(f, "table 1"),
            TableSide::New => write!(f, "table 2"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TablediffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Header mismatch: table 1 has [{}], table 2 has [{}]", .left.join(", "), .right.join(", "))]
    HeaderMismatch { left: Vec<String>, right: Vec<String> },

    #[error("Unknown key column '{column}' (available: {})", .available.join(", "))]
    UnknownKeyColumn { column: String, available: Vec<String> },

    #[error("Duplicate column '{column}' in header of {table}")]
    DuplicateColumn { table: TableSide, column: String },

    #[error("{table} has no rows")]
    EmptyTable { table: TableSide },

    #[error("Duplicate key [{}] in {table} at rows {first_row} and {second_row}", .key.join(", "))]
    DuplicateKey {
        table: TableSide,
        key: Vec<String>,
        first_row: u64,
        second_row: u64,
    },

    #[error("Malformed row {row} in {table}: expected {expected} cells, found {found}")]
    MalformedRow {
        table: TableSide,
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("Source not found: {location}")]
    SourceNotFound { location: String },

    #[error("Format error in '{location}': {message}")]
    Format { location: PathBuf, message: String },

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TablediffError {
    pub fn source_not_found(location: impl Into<String>) -> Self {
        Self::SourceNotFound {
            location: location.into(),
        }
    }

    pub fn format(location: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Format {
            location: location.into(),
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Process exit status reported by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Json(_) => 1,
            Self::Config { .. } => 2,
            Self::HeaderMismatch { .. } | Self::DuplicateColumn { .. } => 3,
            Self::UnknownKeyColumn { .. } => 4,
            Self::EmptyTable { .. } => 5,
            Self::DuplicateKey { .. } => 6,
            Self::SourceNotFound { .. } => 7,
            Self::Format { .. } => 8,
            Self::Sink { .. } => 9,
            Self::MalformedRow { .. } => 10,
        }
    }
}
