//! Main entry point for tablediff CLI

use clap::Parser;
use tablediff::cli::Cli;
use tablediff::commands::execute_command;
use tablediff::logging::init_logging;

fn main() {
    // Parse first so --verbose can pick the log level
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute_command(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
