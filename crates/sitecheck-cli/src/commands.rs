//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sitecheck: data-driven website verification
#[derive(Parser, Debug)]
#[command(name = "sitecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify websites listed in data files
    Run(RunArgs),

    /// Check that data files load
    Validate(ValidateArgs),

    /// List test data records
    Data(DataArgs),

    /// Run an HTTP load test against one URL
    Perf(PerfArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Test data files (.json, .csv, .xlsx, .xls, .ods)
    #[arg(short, long = "data", required = true, num_args = 1..)]
    pub data: Vec<PathBuf>,

    /// Environment to run
    #[arg(short, long, default_value = "dev")]
    pub env: String,

    /// Run the first record of each listed environment instead
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["priority", "smoke"])]
    pub environments: Vec<String>,

    /// Only records of this priority
    #[arg(short, long)]
    pub priority: Option<PriorityArg>,

    /// Only high-priority records
    #[arg(long, conflicts_with = "priority")]
    pub smoke: bool,

    /// Directory holding <env>.yaml files
    #[arg(long, default_value = "data/environments")]
    pub config_dir: PathBuf,

    /// Override the screenshot directory
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,

    /// Disable screenshots
    #[arg(long)]
    pub no_screenshots: bool,

    /// Write an HTML report
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Write a JUnit XML report
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Slack incoming-webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook: Option<String>,

    /// Serve pages from an in-memory driver instead of a browser
    #[arg(long)]
    pub dry_run: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Launch chromium without its sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Fail when the CI quality gates fail
    #[arg(long)]
    pub fail_on_gate: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Test data files
    #[arg(short, long = "data", required = true, num_args = 1..)]
    pub data: Vec<PathBuf>,
}

/// Arguments for the data command
#[derive(Parser, Debug)]
pub struct DataArgs {
    /// Test data files
    #[arg(short, long = "data", required = true, num_args = 1..)]
    pub data: Vec<PathBuf>,

    /// Only records of this environment
    #[arg(short, long)]
    pub env: Option<String>,

    /// Only records of this priority
    #[arg(short, long)]
    pub priority: Option<PriorityArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the perf command
#[derive(Parser, Debug)]
pub struct PerfArgs {
    /// Target URL
    #[arg(long)]
    pub url: String,

    /// Test name used in the report
    #[arg(long, default_value = "Load Test")]
    pub name: String,

    /// Concurrent users
    #[arg(long, default_value = "10")]
    pub users: usize,

    /// Ramp-up period in seconds
    #[arg(long, default_value = "5")]
    pub ramp_up: u64,

    /// Test duration in seconds
    #[arg(long, default_value = "30")]
    pub duration: u64,

    /// Maximum average response time in ms
    #[arg(long, default_value = "2000")]
    pub max_avg_ms: u64,

    /// Maximum 95th percentile in ms
    #[arg(long, default_value = "3000")]
    pub max_p95_ms: u64,

    /// Maximum error rate in percent
    #[arg(long, default_value = "1.0")]
    pub max_error_rate: f64,

    /// Minimum throughput in requests per second
    #[arg(long, default_value = "10.0")]
    pub min_throughput: f64,

    /// Write the metrics as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Priority argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityArg {
    /// Smoke-test candidates
    High,
    /// Regular coverage
    Medium,
    /// Nice-to-have
    Low,
}

impl From<PriorityArg> for sitecheck::Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Self::High,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::Low => Self::Low,
        }
    }
}

/// Listing format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON array
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON lines
    Json,
}

impl From<LogFormatArg> for crate::config::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}
