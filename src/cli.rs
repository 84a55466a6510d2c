//! Command-line interface for tablediff

use crate::config::DiffOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tablediff")]
#[command(about = "A keyed row-diff tool for tabular exports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two tables keyed by one or more columns
    Diff(DiffArgs),

    /// Show the header and row count of a table
    Show {
        /// Input file path
        input: PathBuf,

        /// Sheet to read
        #[arg(long)]
        sheet: Option<String>,

        /// Field delimiter, overriding detection from the extension
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// Old table (table 1)
    pub table1: PathBuf,

    /// New table (table 2)
    pub table2: PathBuf,

    /// Key column names identifying a row (repeatable or comma-separated)
    #[arg(short, long = "key", required = true, value_delimiter = ',')]
    pub keys: Vec<String>,

    /// Sheet to read from table 1
    #[arg(long)]
    pub sheet1: Option<String>,

    /// Sheet to read from table 2
    #[arg(long)]
    pub sheet2: Option<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: "pretty", "csv", "tsv" or "json" (defaults from the output extension)
    #[arg(long)]
    pub format: Option<String>,

    /// Input field delimiter, overriding detection from the extension
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Sort rows by key
    #[arg(long)]
    pub sort_lines: bool,

    /// Do not emit unchanged rows
    #[arg(long)]
    pub suppress_unchanged: bool,

    /// Do not mark added and removed rows
    #[arg(long)]
    pub suppress_added_removed_marks: bool,

    /// Append a column with the row status
    #[arg(long)]
    pub mark_column: Option<String>,

    /// Show old and new values of changed cells
    #[arg(long)]
    pub show_change_details: bool,

    /// Disable colored output
    #[arg(long)]
    pub disable_colors: bool,

    /// Emit the summary counts after the rows
    #[arg(long)]
    pub synthesis: bool,

    /// Write the summary counts to a separate file (implies --synthesis)
    #[arg(long)]
    pub synthesis_output: Option<PathBuf>,

    /// Disable progress spinners
    #[arg(long)]
    pub no_progress: bool,
}

impl DiffArgs {
    pub fn options(&self) -> DiffOptions {
        let mut options = DiffOptions::new()
            .sort_lines(self.sort_lines)
            .suppress_unchanged(self.suppress_unchanged)
            .suppress_added_removed_marks(self.suppress_added_removed_marks)
            .show_change_details(self.show_change_details)
            .disable_colors(self.disable_colors)
            .emit_synthesis(self.synthesis || self.synthesis_output.is_some());
        if let Some(name) = &self.mark_column {
            options = options.mark_column(name.clone());
        }
        options
    }
}

/// Parse output format string for `show`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Accept a single-byte delimiter, or the names "tab"/"\t"
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("Invalid delimiter: '{}'. Must be a single ASCII character.", s)),
    }
}
