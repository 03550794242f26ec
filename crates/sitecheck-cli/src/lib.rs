//! Sitecheck CLI library
//!
//! Command definitions, configuration, output and command handlers for the
//! `sitecheck` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, DataArgs, FormatArg, LogFormatArg, PerfArgs, PriorityArg, RunArgs,
    ValidateArgs,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{check_line, OutputFormat, ProgressReporter};
