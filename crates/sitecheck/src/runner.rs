//! Data-driven execution.
//!
//! For each record the runner navigates, verifies the page object, captures
//! a screenshot and appends the result to a [`TestSummary`]. Records run one
//! after another; a failing record never stops the run.

use crate::config::EnvironmentConfig;
use crate::data::{TestDataProvider, WebsiteTestData};
use crate::driver::PageDriver;
use crate::page::PageObjectManager;
use crate::result::{SitecheckError, SitecheckResult};
use crate::screenshot::ScreenshotStore;
use crate::summary::{TestResult, TestSummary};

/// Result recorded when a record could not be verified at all
#[must_use]
pub fn error_result(data: &WebsiteTestData, err: &SitecheckError) -> TestResult {
    let mut result =
        TestResult::with_context(format!("{} - ERROR", data.test_name), data.environment.clone());
    result.add_test("Execution", false, format!("Exception: {err}"));
    result
}

/// Runs records against one driver session
pub struct DataDrivenRunner {
    driver: Box<dyn PageDriver>,
    config: EnvironmentConfig,
    manager: PageObjectManager,
    screenshots: ScreenshotStore,
}

impl std::fmt::Debug for DataDrivenRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataDrivenRunner")
            .field("config", &self.config)
            .field("manager", &self.manager)
            .field("screenshots", &self.screenshots)
            .finish_non_exhaustive()
    }
}

impl DataDrivenRunner {
    /// Runner whose waits and screenshots follow `config`
    #[must_use]
    pub fn new(driver: Box<dyn PageDriver>, config: EnvironmentConfig) -> Self {
        let manager = PageObjectManager::new(config.timeout());
        let screenshots = ScreenshotStore::from_config(&config);
        Self {
            driver,
            config,
            manager,
            screenshots,
        }
    }

    /// Replace the screenshot store
    #[must_use]
    pub fn with_screenshots(mut self, store: ScreenshotStore) -> Self {
        self.screenshots = store;
        self
    }

    /// Switch to another environment's settings.
    ///
    /// Waits and screenshots follow `config` from the next record on;
    /// screenshot numbering continues where the previous store stopped.
    pub fn configure(&mut self, config: EnvironmentConfig) {
        self.manager = PageObjectManager::new(config.timeout());
        self.screenshots =
            ScreenshotStore::from_config(&config).continuing_from(self.screenshots.count());
        self.config = config;
    }

    /// Environment configuration in use
    #[must_use]
    pub const fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Screenshot store in use
    #[must_use]
    pub const fn screenshots(&self) -> &ScreenshotStore {
        &self.screenshots
    }

    /// Verify one record
    ///
    /// # Errors
    ///
    /// Navigation, load-check and driver failures propagate
    pub async fn run_one(&mut self, data: &WebsiteTestData) -> SitecheckResult<TestResult> {
        let url = self.config.resolve_url(&data.website_url);
        let page = self
            .manager
            .navigate_to_page(self.driver.as_mut(), &url)
            .await?;
        let result = page.verify(self.driver.as_ref(), data).await?;

        if let Err(e) = self
            .screenshots
            .capture(self.driver.as_ref(), &data.test_name)
            .await
        {
            tracing::warn!(test = %data.test_name, error = %e, "screenshot failed");
        }

        tracing::info!(
            test = %data.test_name,
            page = page.page_name(),
            passed = result.passed_count(),
            failed = result.failed_count(),
            "verified"
        );
        Ok(result)
    }

    /// Run every record and collect the results under `label`
    pub async fn run(&mut self, records: &[WebsiteTestData], label: &str) -> TestSummary {
        self.run_with_progress(records, label, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_result` after each record
    pub async fn run_with_progress<F>(
        &mut self,
        records: &[WebsiteTestData],
        label: &str,
        mut on_result: F,
    ) -> TestSummary
    where
        F: FnMut(&TestResult) + Send,
    {
        let mut summary = TestSummary::with_context(label);
        tracing::info!(label, count = records.len(), "executing data set");

        for data in records {
            let result = match self.run_one(data).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(test = %data.test_name, error = %e, "test execution failed");
                    error_result(data, &e)
                }
            };
            on_result(&result);
            summary.add_test_result(result);
        }
        summary
    }

    /// Run the first record of each environment.
    ///
    /// Before each environment the runner is reconfigured with
    /// `load_config(env)`. Returns one summary per environment, labelled
    /// `<env> Environment`; environments without records yield an empty
    /// summary.
    ///
    /// # Errors
    ///
    /// Fails when the provider cannot load its sources or an environment's
    /// configuration cannot be loaded
    pub async fn run_environments<F>(
        &mut self,
        provider: &TestDataProvider,
        environments: &[&str],
        mut load_config: F,
    ) -> SitecheckResult<Vec<TestSummary>>
    where
        F: FnMut(&str) -> SitecheckResult<EnvironmentConfig>,
    {
        let mut summaries = Vec::with_capacity(environments.len());
        for &env in environments {
            self.configure(load_config(env)?);
            let records = provider.for_environment(env)?;
            let sample: Vec<WebsiteTestData> = records.into_iter().take(1).collect();
            if sample.is_empty() {
                tracing::info!(env, "no data available for environment");
            }
            summaries.push(self.run(&sample, &format!("{env} Environment")).await);
        }
        Ok(summaries)
    }

    /// Close the driver session
    pub async fn close(mut self) -> SitecheckResult<()> {
        self.driver.close().await
    }
}
