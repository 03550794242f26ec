//! Locator abstraction for element selection and bounded waiting.
//!
//! A [`Locator`] pairs a [`Selector`] with a wait window. Interaction helpers
//! poll the driver until the element is present and visible, then act once.
//!
//! - An element that never appears fails with [`SitecheckError::ElementNotFound`].
//! - An element that appears but never becomes visible fails with
//!   [`SitecheckError::Timeout`].
//! - [`Locator::is_visible`] turns either outcome into `false`.
//!
//! The action itself is never retried.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::driver::{ElementState, PageDriver};
use crate::result::{SitecheckError, SitecheckResult};

/// Default timeout for bounded waits (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for bounded waits (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "a[href='/signup']")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// JavaScript expression resolving to the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
            Self::Text(t) => {
                format!("Array.from(document.querySelectorAll('body *')).find(el => el.children.length === 0 && el.textContent.includes({t:?}))")
            }
            Self::TestId(id) => format!("document.querySelector('[data-testid={id:?}]')"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::TestId(id) => write!(f, "[data-testid=\"{id}\"]"),
        }
    }
}

/// Locator options for customizing wait behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Upper bound on the wait
    pub timeout: Duration,
    /// Delay between probes
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// A selector plus its wait window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Poll until the element is present and visible.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when the element never appeared, `Timeout` when it
    /// appeared but never became visible, or any driver error from a probe.
    pub async fn wait_for_visible<D>(&self, driver: &D) -> SitecheckResult<ElementState>
    where
        D: PageDriver + ?Sized,
    {
        let start = Instant::now();
        let mut seen = false;

        loop {
            let state = driver.query(&self.selector).await?;
            if state.present && state.visible {
                return Ok(state);
            }
            seen |= state.present;

            let elapsed = start.elapsed();
            if elapsed >= self.options.timeout {
                let waited_ms = elapsed.as_millis() as u64;
                tracing::debug!(selector = %self.selector, waited_ms, seen, "bounded wait expired");
                return Err(if seen {
                    SitecheckError::Timeout {
                        selector: self.selector.to_string(),
                        ms: self.options.timeout.as_millis() as u64,
                    }
                } else {
                    SitecheckError::ElementNotFound {
                        selector: self.selector.to_string(),
                        waited_ms,
                    }
                });
            }

            let remaining = self.options.timeout.saturating_sub(elapsed);
            tokio::time::sleep(self.options.poll_interval.min(remaining)).await;
        }
    }

    /// Wait for the element, then click it once
    pub async fn click<D>(&self, driver: &D) -> SitecheckResult<()>
    where
        D: PageDriver + ?Sized,
    {
        self.wait_for_visible(driver).await?;
        driver.click(&self.selector).await
    }

    /// Wait for the element, then type into it once
    pub async fn type_text<D>(&self, driver: &D, text: &str) -> SitecheckResult<()>
    where
        D: PageDriver + ?Sized,
    {
        self.wait_for_visible(driver).await?;
        driver.type_text(&self.selector, text).await
    }

    /// Wait for the element and return its text content
    pub async fn text<D>(&self, driver: &D) -> SitecheckResult<String>
    where
        D: PageDriver + ?Sized,
    {
        let state = self.wait_for_visible(driver).await?;
        Ok(state.text)
    }

    /// Whether the element becomes visible within the wait window.
    ///
    /// A wait that runs out yields `false`; other driver errors propagate.
    pub async fn is_visible<D>(&self, driver: &D) -> SitecheckResult<bool>
    where
        D: PageDriver + ?Sized,
    {
        match self.wait_for_visible(driver).await {
            Ok(_) => Ok(true),
            Err(SitecheckError::ElementNotFound { .. } | SitecheckError::Timeout { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether the element is present right now (single probe, no wait)
    pub async fn is_present<D>(&self, driver: &D) -> SitecheckResult<bool>
    where
        D: PageDriver + ?Sized,
    {
        Ok(driver.query(&self.selector).await?.present)
    }

    /// Whether the element is present and visible right now (single probe, no wait)
    pub async fn is_displayed<D>(&self, driver: &D) -> SitecheckResult<bool>
    where
        D: PageDriver + ?Sized,
    {
        let state = driver.query(&self.selector).await?;
        Ok(state.present && state.visible)
    }

    /// Text after a bounded wait, or an empty string when the wait runs out
    pub async fn text_or_empty<D>(&self, driver: &D) -> SitecheckResult<String>
    where
        D: PageDriver + ?Sized,
    {
        match self.text(driver).await {
            Ok(text) => Ok(text),
            Err(SitecheckError::ElementNotFound { .. } | SitecheckError::Timeout { .. }) => {
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, MockPage};
    use crate::result::ErrorKind;

    const URL: &str = "https://example.test";

    fn short(selector: &str) -> Locator {
        Locator::new(selector)
            .with_timeout(Duration::from_millis(250))
            .with_poll_interval(Duration::from_millis(20))
    }

    async fn driver_with(page: MockPage) -> MockDriver {
        let mut driver = MockDriver::new().with_page(URL, page);
        driver.navigate(URL).await.unwrap();
        driver
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let q = Selector::css("h1").to_query();
            assert_eq!(q, "document.querySelector(\"h1\")");
        }

        #[test]
        fn test_xpath_query() {
            let q = Selector::xpath("//h1").to_query();
            assert!(q.contains("document.evaluate"));
            assert!(q.contains("//h1"));
        }

        #[test]
        fn test_test_id_query() {
            let q = Selector::test_id("login").to_query();
            assert!(q.contains("data-testid"));
            assert!(q.contains("login"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css(".logo").to_string(), ".logo");
            assert_eq!(Selector::text("Sign up").to_string(), "text=Sign up");
            assert_eq!(Selector::xpath("//a").to_string(), "xpath=//a");
        }
    }

    mod locator_option_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let loc = Locator::new("h1");
            assert_eq!(loc.options().timeout, Duration::from_secs(10));
            assert_eq!(loc.options().poll_interval, Duration::from_millis(100));
            assert_eq!(loc.selector(), &Selector::css("h1"));
        }

        #[test]
        fn test_with_timeout() {
            let loc = Locator::new("h1").with_timeout(Duration::from_secs(3));
            assert_eq!(loc.options().timeout, Duration::from_secs(3));
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_visible_element_returns_immediately() {
            let driver =
                driver_with(MockPage::new("Home").with_element("h1", MockElement::visible("Hi")))
                    .await;
            let text = short("h1").text(&driver).await.unwrap();
            assert_eq!(text, "Hi");
        }

        #[tokio::test]
        async fn test_missing_element_is_not_found() {
            let driver = driver_with(MockPage::new("Home")).await;
            let err = short("h1").click(&driver).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        #[tokio::test]
        async fn test_hidden_element_times_out() {
            let driver =
                driver_with(MockPage::new("Home").with_element("button", MockElement::hidden()))
                    .await;
            let err = short("button").click(&driver).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Timeout);
        }

        #[tokio::test]
        async fn test_element_revealed_while_polling() {
            let driver = driver_with(
                MockPage::new("Home")
                    .with_element("#late", MockElement::visible("late").revealed_after(3)),
            )
            .await;
            assert!(short("#late").is_visible(&driver).await.unwrap());
        }

        #[tokio::test]
        async fn test_is_visible_maps_timeouts_to_false() {
            let driver =
                driver_with(MockPage::new("Home").with_element("button", MockElement::hidden()))
                    .await;
            assert!(!short("button").is_visible(&driver).await.unwrap());
            assert!(!short("missing").is_visible(&driver).await.unwrap());
        }

        #[tokio::test]
        async fn test_is_present_does_not_wait() {
            let driver =
                driver_with(MockPage::new("Home").with_element("button", MockElement::hidden()))
                    .await;
            assert!(short("button").is_present(&driver).await.unwrap());
            assert!(!short("nav").is_present(&driver).await.unwrap());
            assert!(!short("button").is_displayed(&driver).await.unwrap());
        }

        #[tokio::test]
        async fn test_text_or_empty() {
            let driver =
                driver_with(MockPage::new("Home").with_element("h1", MockElement::visible("Title")))
                    .await;
            assert_eq!(short("h1").text_or_empty(&driver).await.unwrap(), "Title");
            assert_eq!(short("h2").text_or_empty(&driver).await.unwrap(), "");
        }

        #[tokio::test]
        async fn test_click_and_type_are_recorded_once() {
            let driver = driver_with(
                MockPage::new("Login")
                    .with_element("#user", MockElement::visible(""))
                    .with_element("#go", MockElement::visible("Go")),
            )
            .await;
            short("#user").type_text(&driver, "octocat").await.unwrap();
            short("#go").click(&driver).await.unwrap();

            assert_eq!(driver.count_calls("type:#user"), 1);
            assert_eq!(driver.count_calls("click:#go"), 1);
        }
    }
}
