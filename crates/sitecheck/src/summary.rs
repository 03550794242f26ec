//! Pass/fail aggregation for page and scenario verification.
//!
//! A [`TestResult`] collects the individual checks made while verifying one
//! page (or one scenario). A [`TestSummary`] owns the results of a whole run,
//! in execution order.
//!
//! ```text
//! TestSummary ──owns──► [TestResult, TestResult, ...]
//!                            │
//!                            └──owns──► [SingleTest, SingleTest, ...]
//! ```
//!
//! Counters on `TestResult` are maintained incrementally by `add_test`, so
//! `passed_count + failed_count == tests.len()` holds after every call.
//! `TestSummary` aggregates are recomputed on every call and never cached.
//!
//! A result (or summary) with zero checks is **not** considered passing.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Marker printed before a passing check
const PASS_MARKER: &str = "✅ PASS";
/// Marker printed before a failing check
const FAIL_MARKER: &str = "❌ FAIL";

/// Percentage of `passed` over `total`, `0.0` when there is nothing to divide.
fn percentage(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    passed as f64 * 100.0 / total as f64
}

/// Round to one decimal, halves away from zero (`6.25` shows as `6.3`)
pub(crate) fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `" [context]"`, or nothing when the context is empty
fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" [{context}]")
    }
}

/// One recorded check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleTest {
    description: String,
    passed: bool,
    details: String,
}

impl SingleTest {
    /// What was checked
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the check passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Free-form details (expected/actual values)
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }
}

/// Outcome of verifying one page or scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTestResult")]
pub struct TestResult {
    test_name: String,
    context: String,
    tests: Vec<SingleTest>,
    passed_count: usize,
    failed_count: usize,
}

/// Wire shape of [`TestResult`]; counters are checked against `tests`
#[derive(Deserialize)]
struct RawTestResult {
    test_name: String,
    #[serde(default)]
    context: String,
    tests: Vec<SingleTest>,
    passed_count: usize,
    failed_count: usize,
}

impl TryFrom<RawTestResult> for TestResult {
    type Error = String;

    fn try_from(raw: RawTestResult) -> Result<Self, Self::Error> {
        let passed = raw.tests.iter().filter(|t| t.passed).count();
        let failed = raw.tests.len() - passed;
        if raw.passed_count != passed || raw.failed_count != failed {
            return Err(format!(
                "result '{}' claims {}/{} passed/failed but lists {passed}/{failed}",
                raw.test_name, raw.passed_count, raw.failed_count
            ));
        }
        Ok(Self {
            test_name: raw.test_name,
            context: raw.context,
            tests: raw.tests,
            passed_count: passed,
            failed_count: failed,
        })
    }
}

impl TestResult {
    /// Create an empty result
    #[must_use]
    pub fn new(test_name: impl Into<String>) -> Self {
        Self::with_context(test_name, "")
    }

    /// Create an empty result carrying data-set context (environment, row name, ...)
    #[must_use]
    pub fn with_context(test_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            context: context.into(),
            tests: Vec::new(),
            passed_count: 0,
            failed_count: 0,
        }
    }

    /// Record one check
    pub fn add_test(
        &mut self,
        description: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
    ) {
        self.tests.push(SingleTest {
            description: description.into(),
            passed,
            details: details.into(),
        });
        if passed {
            self.passed_count += 1;
        } else {
            self.failed_count += 1;
        }
    }

    /// Result name
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Context string, empty when none was given
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Recorded checks in insertion order
    #[must_use]
    pub fn tests(&self) -> &[SingleTest] {
        &self.tests
    }

    /// Number of passing checks
    #[must_use]
    pub const fn passed_count(&self) -> usize {
        self.passed_count
    }

    /// Number of failing checks
    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Number of recorded checks
    #[must_use]
    pub const fn total_tests(&self) -> usize {
        self.passed_count + self.failed_count
    }

    /// Pass percentage in `0.0..=100.0`; `0.0` with no checks
    #[must_use]
    pub fn pass_percentage(&self) -> f64 {
        percentage(self.passed_count, self.total_tests())
    }

    /// True iff nothing failed and at least one check passed
    #[must_use]
    pub const fn all_tests_passed(&self) -> bool {
        self.failed_count == 0 && self.passed_count > 0
    }

    /// Failing checks
    #[must_use]
    pub fn failures(&self) -> Vec<&SingleTest> {
        self.tests.iter().filter(|t| !t.passed).collect()
    }

    /// One-line summary: `name [context]: P/T passed (X.X%)`
    #[must_use]
    pub fn overall_result(&self) -> String {
        format!(
            "{}{}: {}/{} passed ({:.1}%)",
            self.test_name,
            context_suffix(&self.context),
            self.passed_count,
            self.total_tests(),
            one_decimal(self.pass_percentage())
        )
    }

    /// Every check with its marker and details, followed by the summary line
    #[must_use]
    pub fn detailed_results(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n=== {}{} ===",
            self.test_name,
            context_suffix(&self.context)
        );

        for test in &self.tests {
            let marker = if test.passed { PASS_MARKER } else { FAIL_MARKER };
            let _ = writeln!(out, "{marker}: {}", test.description);
            if !test.details.is_empty() {
                let _ = writeln!(out, "    Details: {}", test.details);
            }
        }

        let _ = writeln!(out, "\nSUMMARY: {}", self.overall_result());
        out
    }
}

/// All results of one run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    results: Vec<TestResult>,
    context: String,
}

impl TestSummary {
    /// Create an empty summary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty summary labelled with a data-set context
    #[must_use]
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            context: context.into(),
        }
    }

    /// Replace the summary context
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    /// Summary context, empty when none was given
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Append a result
    pub fn add_test_result(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Append every result of `other`, preserving its order.
    ///
    /// Used to combine summaries that were built by independent sessions.
    pub fn merge(&mut self, other: Self) {
        self.results.extend(other.results);
    }

    /// Collected results in insertion order
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Results that did not pass
    #[must_use]
    pub fn failed_results(&self) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|r| !r.all_tests_passed())
            .collect()
    }

    /// Number of collected results
    #[must_use]
    pub fn total_suites(&self) -> usize {
        self.results.len()
    }

    /// Number of checks across all results
    #[must_use]
    pub fn total_tests(&self) -> usize {
        self.results.iter().map(TestResult::total_tests).sum()
    }

    /// Passing checks across all results
    #[must_use]
    pub fn total_passed(&self) -> usize {
        self.results.iter().map(TestResult::passed_count).sum()
    }

    /// Failing checks across all results
    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.results.iter().map(TestResult::failed_count).sum()
    }

    /// Pass percentage over all checks; `0.0` when empty
    #[must_use]
    pub fn pass_percentage(&self) -> f64 {
        percentage(self.total_passed(), self.total_tests())
    }

    /// True iff nothing failed and at least one check passed
    #[must_use]
    pub fn all_tests_passed(&self) -> bool {
        self.total_failed() == 0 && self.total_passed() > 0
    }

    /// Top-line summary block
    #[must_use]
    pub fn summary_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Test Summary{}:", context_suffix(&self.context));
        let _ = writeln!(out, "  Test Suites: {}", self.total_suites());
        let _ = writeln!(out, "  Total Tests: {}", self.total_tests());
        let _ = writeln!(out, "  Passed: {}", self.total_passed());
        let _ = writeln!(out, "  Failed: {}", self.total_failed());
        let _ = writeln!(
            out,
            "  Pass Rate: {:.1}%",
            one_decimal(self.pass_percentage())
        );
        out
    }

    /// Summary block followed by every result's detailed output
    #[must_use]
    pub fn detailed_summary(&self) -> String {
        let mut out = self.summary_string();
        out.push('\n');
        out.push_str("Detailed Results:\n");
        for result in &self.results {
            out.push_str(&result.detailed_results());
            out.push('\n');
        }
        out
    }
}
