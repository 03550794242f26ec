//! `sitecheck run`

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::output::ProgressReporter;
use crate::{CliConfig, CliError, CliResult, RunArgs};
use sitecheck::analyzer::{ExecutionSummary, QualityGateResult, QualityGates};
use sitecheck::reporter::write_json;
use sitecheck::{
    DataDrivenRunner, EnvironmentConfig, HtmlReport, JunitReport, MockDriver, MockElement,
    MockPage, PageDriver, Priority, SitecheckResult, SlackNotifier, TestSummary, WebsiteTestData,
};

/// Keep records of `priority` when one is given
#[must_use]
pub fn select_records(
    records: Vec<WebsiteTestData>,
    priority: Option<Priority>,
) -> Vec<WebsiteTestData> {
    match priority {
        Some(p) => records.into_iter().filter(|r| r.priority == p).collect(),
        None => records,
    }
}

/// Records with their URLs resolved against their environment's base URL
fn resolve_urls(
    args: &RunArgs,
    records: &[WebsiteTestData],
) -> SitecheckResult<Vec<WebsiteTestData>> {
    let mut configs: BTreeMap<&str, EnvironmentConfig> = BTreeMap::new();
    let mut resolved = Vec::with_capacity(records.len());
    for record in records {
        let env = record.environment.as_str();
        let config = match configs.entry(env) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(environment_config(args, env)?),
        };
        let mut record = record.clone();
        record.website_url = config.resolve_url(&record.website_url);
        resolved.push(record);
    }
    Ok(resolved)
}

/// In-memory driver serving one page per record URL.
///
/// Each page's title carries the website name and every expected title for
/// that URL, and the page exposes the elements the page objects look for.
#[must_use]
pub fn dry_run_driver(records: &[WebsiteTestData]) -> MockDriver {
    let mut pages: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        let titles = pages.entry(record.website_url.as_str()).or_default();
        if !titles.contains(&record.website.as_str()) {
            titles.push(record.website.as_str());
        }
        if let Some(expected) = record.expected_title.as_deref() {
            if !titles.contains(&expected) {
                titles.push(expected);
            }
        }
    }

    let mut driver = MockDriver::new();
    for (url, titles) in pages {
        let heading = titles.first().copied().unwrap_or("Home");
        let page = MockPage::new(titles.join(" | "))
            .with_element("h1", MockElement::visible(heading))
            .with_element("h1, .hero-title, .main-title", MockElement::visible(heading))
            .with_element("main, .content, .main-content", MockElement::visible(""))
            .with_element(
                "main, .content, .main-content, #bodyColumn",
                MockElement::visible(""),
            )
            .with_element("a[href='/signup']", MockElement::visible("Sign up"))
            .with_element("a[href='/login']", MockElement::visible("Sign in"))
            .with_element(".octicon-mark-github", MockElement::visible(""));
        driver.add_page(url, page);
    }
    driver
}

#[cfg(feature = "browser")]
async fn launch_browser(env: &EnvironmentConfig, args: &RunArgs) -> CliResult<Box<dyn PageDriver>> {
    use sitecheck::{BrowserOptions, ChromiumDriver};

    let mut options = BrowserOptions::from_env_config(env);
    if args.no_sandbox {
        options = options.no_sandbox();
    }
    Ok(Box::new(ChromiumDriver::launch(&options).await?))
}

#[cfg(not(feature = "browser"))]
async fn launch_browser(
    _env: &EnvironmentConfig,
    _args: &RunArgs,
) -> CliResult<Box<dyn PageDriver>> {
    Err(CliError::config(
        "browser support not compiled in; rebuild with --features browser or pass --dry-run",
    ))
}

/// `<config_dir>/<name>.yaml` with the command-line overrides applied
fn environment_config(args: &RunArgs, name: &str) -> SitecheckResult<EnvironmentConfig> {
    let mut env = EnvironmentConfig::load(&args.config_dir, name)?;
    if let Some(ref dir) = args.screenshot_dir {
        env = env.with_screenshot_dir(dir);
    }
    if args.no_screenshots {
        env = env.with_screenshots(false);
    }
    if args.headed {
        env = env.with_headless(false);
    }
    Ok(env)
}

fn write_reports(summary: &TestSummary, env: &str, args: &RunArgs) -> CliResult<()> {
    if let Some(ref path) = args.html {
        HtmlReport::new("Sitecheck Report")
            .with_environment(env)
            .write(summary, path)
            .map_err(|e| CliError::report_generation(e.to_string()))?;
    }
    if let Some(ref path) = args.junit {
        JunitReport::new("sitecheck")
            .write(summary, path)
            .map_err(|e| CliError::report_generation(e.to_string()))?;
    }
    if let Some(ref path) = args.json {
        write_json(summary, path).map_err(|e| CliError::report_generation(e.to_string()))?;
    }
    Ok(())
}

/// Error for a finished run, if it should fail the process
#[must_use]
pub fn run_outcome(
    summary: &TestSummary,
    gates: &QualityGateResult,
    fail_on_gate: bool,
) -> Option<CliError> {
    if !summary.all_tests_passed() {
        return Some(CliError::test_execution(format!(
            "{} of {} checks failed",
            summary.total_failed(),
            summary.total_tests()
        )));
    }
    if fail_on_gate && !gates.overall_passed {
        return Some(CliError::test_execution(format!(
            "quality gates failed: {}",
            gates.messages.join("; ")
        )));
    }
    None
}

/// Verify every selected record and report the outcome
pub async fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let detailed = config.verbosity.is_verbose();
    let provider = super::provider_for(&args.data);
    let env = environment_config(args, &args.env)?;

    let priority = if args.smoke {
        Some(Priority::High)
    } else {
        args.priority.map(Priority::from)
    };
    let per_environment = !args.environments.is_empty();
    let records = if per_environment {
        provider.all()?
    } else {
        select_records(provider.for_environment(&args.env)?, priority)
    };
    if records.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no test data selected for environment '{}'",
            args.env
        )));
    }

    let driver: Box<dyn PageDriver> = if args.dry_run {
        reporter.info("dry run: serving pages from memory");
        Box::new(dry_run_driver(&resolve_urls(args, &records)?))
    } else {
        launch_browser(&env, args).await?
    };
    let mut runner = DataDrivenRunner::new(driver, env);
    let started = Instant::now();

    let summary = if per_environment {
        let envs: Vec<&str> = args.environments.iter().map(String::as_str).collect();
        let summaries = runner
            .run_environments(&provider, &envs, |name| environment_config(args, name))
            .await?;
        let mut merged = TestSummary::with_context("All Environments");
        for summary in summaries {
            reporter.header(summary.context());
            for result in summary.results() {
                reporter.result(result, detailed);
            }
            merged.merge(summary);
        }
        merged
    } else {
        reporter.header(&format!("{} Environment", args.env));
        reporter.start_progress(records.len() as u64, "verifying");
        let label = format!("{} Environment", args.env);
        let summary = runner
            .run_with_progress(&records, &label, |result| {
                reporter.result(result, detailed);
                reporter.increment(1);
            })
            .await;
        reporter.finish();
        summary
    };
    let elapsed = started.elapsed();

    if let Err(e) = runner.close().await {
        tracing::warn!(error = %e, "driver did not close cleanly");
    }

    reporter.summary(
        summary.total_suites(),
        summary.total_passed(),
        summary.total_failed(),
        elapsed,
    );
    write_reports(&summary, &args.env, args)?;

    let mut analyzed = ExecutionSummary::from(&summary);
    analyzed.execution_time_ms = elapsed.as_millis() as u64;
    let gates = QualityGates::default().check(&analyzed);
    for message in &gates.messages {
        reporter.warning(message);
    }

    if let Some(ref url) = args.slack_webhook {
        notify(url, &analyzed, &args.env, &reporter).await;
    }

    match run_outcome(&summary, &gates, args.fail_on_gate) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn notify(url: &str, analyzed: &ExecutionSummary, env: &str, reporter: &ProgressReporter) {
    let notifier = SlackNotifier::new(url);
    match tokio::time::timeout(
        Duration::from_secs(45),
        notifier.notify_completion(analyzed, env),
    )
    .await
    {
        Ok(Ok(())) => reporter.info("Slack notification sent"),
        Ok(Err(e)) => reporter.warning(&format!("Slack notification failed: {e}")),
        Err(_) => reporter.warning("Slack notification timed out"),
    }
}
