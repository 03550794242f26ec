//! Sitecheck: data-driven website verification
//!
//! Records loaded from JSON, CSV or Excel sources name a website and what to
//! expect from it. A [`DataDrivenRunner`] navigates to each site through a
//! [`PageDriver`], picks the matching page object and collects every check
//! into a [`TestResult`]; results roll up into a [`TestSummary`] that feeds
//! the HTML/JUnit/JSON reporters, CI quality gates and Slack notifications.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ TestData     │   │ DataDriven   │   │ Page objects │   │ PageDriver   │
//! │ Provider     │──►│ Runner       │──►│ (Verifiable) │──►│ CDP / Mock   │
//! └──────────────┘   └──────┬───────┘   └──────────────┘   └──────────────┘
//!                           ▼
//!                    ┌──────────────┐   ┌──────────────────────────────────┐
//!                    │ TestSummary  │──►│ HTML · JUnit · JSON · Slack      │
//!                    └──────────────┘   └──────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sitecheck::TestResult;
//!
//! let mut result = TestResult::new("Login Page");
//! result.add_test("Title present", true, "");
//! result.add_test("Button visible", false, "not found");
//! assert!(result.overall_result().contains("50.0%"));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod config;
mod driver;
mod locator;
mod result;
mod runner;
mod screenshot;
mod summary;

/// Test data sources: JSON, CSV and Excel records
pub mod data;

/// Page objects and URL dispatch
pub mod page;

/// HTML, JUnit XML and JSON reports
pub mod reporter;

/// Execution analysis and quality gates
pub mod analyzer;

/// Slack webhook notifications
pub mod notify;

/// HTTP load generation
pub mod perf;

/// Chromium control over CDP
#[cfg(feature = "browser")]
pub mod browser;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_support;

pub use analyzer::{
    ExecutionRecord, ExecutionSummary, QualityGateResult, QualityGates, TestStatus,
};
#[cfg(feature = "browser")]
pub use browser::{BrowserOptions, ChromiumDriver};
pub use config::{
    EnvironmentConfig, DEFAULT_BASE_URL, DEFAULT_SCREENSHOT_DIR, DEFAULT_TIMEOUT_SECONDS,
};
pub use data::{
    LinkData, Priority, SourceFormat, SourceValidation, TestDataProvider, WebsiteTestData,
};
pub use driver::{ElementState, MockDriver, MockElement, MockPage, PageDriver, PNG_MAGIC};
pub use locator::{
    Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use notify::SlackNotifier;
pub use page::{PageKind, PageObjectManager, Verifiable};
pub use perf::{
    LoadTest, PerformanceMetrics, PerformanceResult, PerformanceThresholds,
    PerformanceValidation,
};
pub use reporter::{HtmlReport, JunitReport};
pub use result::{ErrorKind, SitecheckError, SitecheckResult};
pub use runner::{error_result, DataDrivenRunner};
pub use screenshot::{sanitize_name, ScreenshotStore};
pub use summary::{SingleTest, TestResult, TestSummary};
