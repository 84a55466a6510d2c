//! Logger setup for the CLI

use env_logger::{Builder, Env};
use log::LevelFilter;

/// `--verbose` picks the base level; filters found through `env` (normally
/// `RUST_LOG`) are applied on top and win.
pub fn logger_builder<'a>(verbose: bool, env: impl Into<Env<'a>>) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    builder.parse_env(env);
    builder
}

pub fn init_logging(verbose: bool) {
    logger_builder(verbose, Env::default()).init();
}
