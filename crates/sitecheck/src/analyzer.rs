//! Execution analysis and CI quality gates.
//!
//! [`ExecutionSummary`] condenses a flat list of test outcomes into totals,
//! a rounded success rate and the names of failed tests. [`QualityGates`]
//! turns that summary into a pass/fail decision for a pipeline.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::summary::TestSummary;

/// Outcome of a single executed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// All checks passed
    Passed,
    /// At least one check failed
    Failed,
    /// Not executed
    Skipped,
}

/// One executed test as seen by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Test name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Failure message, empty unless failed
    pub failure_message: String,
    /// Wall time spent on the test
    pub duration: Duration,
}

impl ExecutionRecord {
    /// Passed record
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            failure_message: String::new(),
            duration,
        }
    }

    /// Failed record with a message
    #[must_use]
    pub fn failed(name: impl Into<String>, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            failure_message: message.into(),
            duration,
        }
    }

    /// Skipped record
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            failure_message: String::new(),
            duration: Duration::ZERO,
        }
    }
}

/// Totals over a set of [`ExecutionRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Number of records
    pub total_tests: usize,
    /// Passed records
    pub passed_tests: usize,
    /// Failed records
    pub failed_tests: usize,
    /// Skipped records
    pub skipped_tests: usize,
    /// Percentage of passed records, two decimals
    pub success_rate: f64,
    /// Sum of record durations in milliseconds
    pub execution_time_ms: u64,
    /// `"<name>: <message>"` for each failed record
    pub failed_test_names: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ExecutionSummary {
    /// Analyze a set of records
    #[must_use]
    pub fn analyze(records: &[ExecutionRecord]) -> Self {
        let mut summary = Self {
            total_tests: records.len(),
            ..Self::default()
        };

        for record in records {
            summary.execution_time_ms += record.duration.as_millis() as u64;
            match record.status {
                TestStatus::Passed => summary.passed_tests += 1,
                TestStatus::Failed => {
                    summary.failed_tests += 1;
                    summary
                        .failed_test_names
                        .push(format!("{}: {}", record.name, record.failure_message));
                }
                TestStatus::Skipped => summary.skipped_tests += 1,
            }
        }

        if summary.total_tests > 0 {
            summary.success_rate =
                round2(summary.passed_tests as f64 / summary.total_tests as f64 * 100.0);
        }
        summary
    }

    /// Whether any record failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_tests > 0
    }

    /// Plain-text report with a failed-test section when needed
    #[must_use]
    pub fn detailed_report(&self) -> String {
        let mut report = String::from("=== TEST EXECUTION SUMMARY ===\n");
        let _ = writeln!(report, "Total Tests: {}", self.total_tests);
        let _ = writeln!(report, "Passed: {}", self.passed_tests);
        let _ = writeln!(report, "Failed: {}", self.failed_tests);
        let _ = writeln!(report, "Skipped: {}", self.skipped_tests);
        let _ = writeln!(report, "Success Rate: {}%", self.success_rate);
        let _ = writeln!(report, "Total Execution Time: {}ms", self.execution_time_ms);

        if self.has_failures() {
            report.push_str("\n=== FAILED TESTS ===\n");
            for name in &self.failed_test_names {
                let _ = writeln!(report, "- {name}");
            }
        }
        report
    }
}

impl From<&TestSummary> for ExecutionSummary {
    /// Each [`TestResult`](crate::summary::TestResult) becomes one record;
    /// its failure message joins the descriptions of its failed checks.
    fn from(summary: &TestSummary) -> Self {
        let records: Vec<ExecutionRecord> = summary
            .results()
            .iter()
            .map(|result| {
                if result.all_tests_passed() {
                    ExecutionRecord::passed(result.test_name(), Duration::ZERO)
                } else if result.total_tests() == 0 {
                    ExecutionRecord::skipped(result.test_name())
                } else {
                    let message = result
                        .failures()
                        .iter()
                        .map(|t| t.description())
                        .collect::<Vec<_>>()
                        .join(", ");
                    ExecutionRecord::failed(result.test_name(), message, Duration::ZERO)
                }
            })
            .collect();
        Self::analyze(&records)
    }
}

/// Pipeline acceptance criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGates {
    /// Minimum success rate in percent
    pub min_success_rate: f64,
    /// Maximum total execution time in milliseconds
    pub max_execution_time_ms: u64,
    /// Maximum number of failed tests
    pub max_failures: usize,
}

impl Default for QualityGates {
    fn default() -> Self {
        Self {
            min_success_rate: 98.0,
            max_execution_time_ms: 900_000,
            max_failures: 1,
        }
    }
}

/// Per-gate outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGateResult {
    /// Success rate gate
    pub pass_rate_passed: bool,
    /// Execution time gate
    pub execution_time_passed: bool,
    /// Failure count gate
    pub failure_count_passed: bool,
    /// All gates passed
    pub overall_passed: bool,
    /// One message per failed gate
    pub messages: Vec<String>,
}

impl QualityGates {
    /// Evaluate every gate against `summary`
    #[must_use]
    pub fn check(&self, summary: &ExecutionSummary) -> QualityGateResult {
        let pass_rate_passed = summary.success_rate >= self.min_success_rate;
        let execution_time_passed = summary.execution_time_ms <= self.max_execution_time_ms;
        let failure_count_passed = summary.failed_tests <= self.max_failures;

        let mut messages = Vec::new();
        if !pass_rate_passed {
            messages.push(format!(
                "Pass rate ({}%) below minimum ({}%)",
                summary.success_rate, self.min_success_rate
            ));
        }
        if !execution_time_passed {
            messages.push(format!(
                "Execution time ({}ms) exceeded maximum ({}ms)",
                summary.execution_time_ms, self.max_execution_time_ms
            ));
        }
        if !failure_count_passed {
            messages.push(format!(
                "Too many failures ({}) exceeded maximum ({})",
                summary.failed_tests, self.max_failures
            ));
        }

        let overall_passed = pass_rate_passed && execution_time_passed && failure_count_passed;
        if !overall_passed {
            tracing::warn!(failed_gates = messages.len(), "quality gates failed");
        }

        QualityGateResult {
            pass_rate_passed,
            execution_time_passed,
            failure_count_passed,
            overall_passed,
            messages,
        }
    }
}
