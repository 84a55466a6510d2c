//! Command implementations for tablediff CLI

use crate::cli::{Commands, DiffArgs, OutputFormat};
use crate::diff::DiffClassifier;
use crate::error::{Result, TablediffError};
use crate::output::{JsonFormatter, OutputAssembler, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::sink::{create_sink, SinkFormat};
use crate::source::open_source;
use crate::synthesis::Synthesis;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Diff(args) => diff_command(&args).map(|_| ()),
        Commands::Show {
            input,
            sheet,
            delimiter,
            format,
        } => show_command(&input, sheet.as_deref(), delimiter, &format),
    }
}

/// Compare two tables and write the annotated diff
pub fn diff_command(args: &DiffArgs) -> Result<Synthesis> {
    let options = args.options();
    let assembler = OutputAssembler::new(options.clone())?;
    let format = resolve_sink_format(args.format.as_deref(), args.output.as_deref())?;

    let source1 = open_source(&args.table1, args.delimiter)?;
    let source2 = open_source(&args.table2, args.delimiter)?;
    log::info!(
        "Comparing '{}' with '{}' on key [{}]",
        source1.location(),
        source2.location(),
        args.keys.join(", ")
    );

    let table1 = source1.open(args.sheet1.as_deref())?;
    let table2 = source2.open(args.sheet2.as_deref())?;

    let progress = if args.no_progress || args.output.is_none() {
        ProgressReporter::new_minimal()
    } else {
        ProgressReporter::new_for_diff()
    };
    let result = DiffClassifier::new(options.show_change_details)
        .with_progress(progress)
        .classify(table1, table2, &args.keys)?;

    // A failed diff leaves no output file
    options.validate_against(&result.header)?;
    let mut sink = create_sink(
        format,
        args.output.as_deref(),
        args.synthesis_output.as_deref(),
    )?;
    let written = assembler.assemble(&result, sink.as_mut())?;

    if let Some(path) = &args.output {
        log::info!("Wrote {} rows to {}", written, path.display());
    }
    Ok(result.synthesis)
}

/// Show the header and size of a table
fn show_command(input: &Path, sheet: Option<&str>, delimiter: Option<u8>, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(TablediffError::config)?;
    let source = open_source(input, delimiter)?;
    let table = source.open(sheet)?;

    let header = table.header;
    let mut row_count = 0u64;
    for row in table.rows {
        row?;
        row_count += 1;
    }

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_table_info(&source.location(), &header, row_count),
        OutputFormat::Json => {
            println!("{}", JsonFormatter::format_table_info(&source.location(), &header, row_count)?)
        }
    }
    Ok(())
}

/// Explicit format wins, then the output extension, then the terminal table
fn resolve_sink_format(format: Option<&str>, output: Option<&Path>) -> Result<SinkFormat> {
    if let Some(format) = format {
        return SinkFormat::parse(format).map_err(TablediffError::config);
    }
    Ok(output
        .and_then(SinkFormat::from_path)
        .unwrap_or(SinkFormat::Pretty))
}
