//! Sitecheck CLI: data-driven website verification
//!
//! ## Usage
//!
//! ```bash
//! sitecheck run --data data/links.json --env staging   # Verify websites
//! sitecheck run --data data/tests.csv --smoke --dry-run  # High priority, no browser
//! sitecheck validate --data data/tests.xlsx             # Check data files
//! sitecheck perf --url https://example.com --users 20   # Load test
//! ```

use clap::Parser;
use sitecheck_cli::{
    handlers, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, LogFormat, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init(&config);

    match cli.command {
        Commands::Run(args) => runtime()?.block_on(handlers::execute_run(&config, &args)),
        Commands::Validate(args) => handlers::execute_validate(&config, &args),
        Commands::Data(args) => handlers::execute_data(&args),
        Commands::Perf(args) => runtime()?.block_on(handlers::execute_perf(&config, &args)),
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();
    let log_format: LogFormat = cli.log_format.into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_format(log_format)
}
