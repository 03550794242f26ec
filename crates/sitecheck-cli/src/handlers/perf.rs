//! `sitecheck perf`

use std::time::Duration;

use crate::output::ProgressReporter;
use crate::{CliConfig, CliError, CliResult, PerfArgs};
use sitecheck::perf::{LoadTest, PerformanceThresholds};

/// Thresholds from the command line
#[must_use]
pub fn thresholds(args: &PerfArgs) -> PerformanceThresholds {
    PerformanceThresholds {
        max_average_response_ms: args.max_avg_ms,
        max_p95_response_ms: args.max_p95_ms,
        max_error_rate: args.max_error_rate,
        min_throughput: args.min_throughput,
    }
}

/// Run the load test, print the report and check thresholds
pub async fn execute_perf(config: &CliConfig, args: &PerfArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.info(&format!(
        "{} users against {} for {}s (ramp-up {}s)",
        args.users, args.url, args.duration, args.ramp_up
    ));

    let result = LoadTest::new(&args.name, &args.url)
        .with_users(args.users)
        .with_ramp_up(Duration::from_secs(args.ramp_up))
        .with_duration(Duration::from_secs(args.duration))
        .run()
        .await?;

    if !config.verbosity.is_quiet() {
        print!("{}", result.performance_report());
    }
    if let Some(ref path) = args.json {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&result)?)?;
    }

    let validation = thresholds(args).validate(&result.metrics);
    if validation.passed {
        reporter.success("performance thresholds met");
        return Ok(());
    }
    for violation in &validation.violations {
        reporter.failure(violation);
    }
    Err(CliError::test_execution(format!(
        "{} performance thresholds violated",
        validation.violations.len()
    )))
}
