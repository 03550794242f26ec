//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use sitecheck::{SingleTest, TestResult};
use std::time::Duration;

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// One indented line per check
#[must_use]
pub fn check_line(test: &SingleTest, use_color: bool) -> String {
    let mark = match (test.passed(), use_color) {
        (true, true) => style("✓").green().to_string(),
        (false, true) => style("✗").red().to_string(),
        (true, false) => "ok".to_string(),
        (false, false) => "FAILED".to_string(),
    };
    if test.details().is_empty() {
        format!("    {mark} {}", test.description())
    } else {
        format!("    {mark} {}: {}", test.description(), test.details())
    }
}

/// Progress reporter for test execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(line);
            }),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Start a progress bar over `total` records
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line("");
        self.write_line(&styled);
    }

    /// Print one verified record; checks are listed when `detailed` or failed
    pub fn result(&self, result: &TestResult, detailed: bool) {
        if result.all_tests_passed() {
            self.success(&result.overall_result());
        } else {
            self.failure(&result.overall_result());
        }
        if self.quiet && result.all_tests_passed() {
            return;
        }
        for test in result.tests() {
            if detailed || !test.passed() {
                self.write_line(&check_line(test, self.use_color));
            }
        }
    }

    /// Print run totals
    pub fn summary(&self, suites: usize, passed: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        self.write_line("");

        let total = passed + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();

            let status = if failed > 0 || total == 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.write_line(&format!(
                "{} {} checks across {} records in {:.2}s ({} passed, {} failed)",
                status,
                total,
                suites,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 || total == 0 {
                "FAILED"
            } else {
                "PASSED"
            };
            self.write_line(&format!(
                "{status} {total} checks across {suites} records in {duration_secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}
