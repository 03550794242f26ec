//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, LogFormat, Verbosity};

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_directive(verbosity: Verbosity) -> String {
    let level = verbosity.log_filter();
    let global = if verbosity.is_quiet() { "error" } else { "warn" };
    format!("{global},sitecheck={level},sitecheck_cli={level}")
}

/// Install the global subscriber on stderr; `RUST_LOG` overrides `-v`.
///
/// Calling this twice keeps the first subscriber.
pub fn init(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_ansi(config.color.should_color()).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
