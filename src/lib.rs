//! # tablediff
//!
//! A keyed row-diff tool: compares two exports of the same tabular dataset,
//! matching rows by one or more key columns, and classifies every row as
//! unchanged, changed, added or removed.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod output;
pub mod progress;
pub mod sink;
pub mod source;
pub mod synthesis;
pub mod validation;

pub use config::DiffOptions;
pub use diff::{diff_tables, DiffClassifier, DiffResult};
pub use error::{Result, TableSide, TablediffError};
pub use model::{CellStatus, DiffEntry, Header, Key, Row, RowStatus};
pub use output::{EmittedRow, OutputAssembler};
pub use sink::{MemorySink, TableSink};
pub use source::{MemorySource, Table, TableSource};
pub use synthesis::Synthesis;

/// Rows processed between progress updates
pub const PROGRESS_INTERVAL: u64 = 10000;

/// Entry count above which sorting runs in parallel
pub const PARALLEL_SORT_THRESHOLD: usize = 50_000;
