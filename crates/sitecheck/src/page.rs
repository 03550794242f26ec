//! Page objects.
//!
//! Each known site gets a small value type holding its locators and
//! implementing [`Verifiable`]. There is no shared base type: the common
//! pieces (title check, bounded text lookup) are free helpers.
//!
//! ```ignore
//! let manager = PageObjectManager::new(config.timeout());
//! let page = manager.navigate_to_page(&mut driver, &data.website_url).await?;
//! let result = page.verify(&driver, &data).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::data::WebsiteTestData;
use crate::driver::PageDriver;
use crate::locator::{Locator, DEFAULT_POLL_INTERVAL_MS};
use crate::result::{SitecheckError, SitecheckResult};
use crate::summary::TestResult;

/// A page that can check itself against a test data record
#[async_trait]
pub trait Verifiable: Send + Sync {
    /// Human-readable page type, e.g. "GitHub HomePage"
    fn page_name(&self) -> &'static str;

    /// Substring the document title must contain once the page has loaded
    fn title_keyword(&self) -> Option<&'static str> {
        None
    }

    /// Run every check for this page and collect them into one result
    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult>;
}

/// Page families recognised by URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// github.com
    GitHub,
    /// junit.org
    JUnit,
    /// maven.apache.org
    Maven,
    /// selenium.dev
    Selenium,
    /// Anything else
    Generic,
}

impl PageKind {
    /// Classify a URL by host substring
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        if url.contains("github.com") {
            Self::GitHub
        } else if url.contains("junit.org") {
            Self::JUnit
        } else if url.contains("maven.apache.org") {
            Self::Maven
        } else if url.contains("selenium.dev") {
            Self::Selenium
        } else {
            Self::Generic
        }
    }

    /// Display name of the page type
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub HomePage",
            Self::JUnit => "JUnit HomePage",
            Self::Maven => "Maven HomePage",
            Self::Selenium => "Selenium HomePage",
            Self::Generic => "Generic Page",
        }
    }

    /// Build the page object for this kind
    #[must_use]
    pub fn page_object(self, timeout: Duration) -> Box<dyn Verifiable> {
        match self {
            Self::GitHub => Box::new(GitHubHomePage::new(timeout)),
            Self::JUnit => Box::new(JUnitHomePage::new(timeout)),
            Self::Maven => Box::new(MavenHomePage::new(timeout)),
            Self::Selenium => Box::new(SeleniumHomePage::new(timeout)),
            Self::Generic => Box::new(GenericPage),
        }
    }
}

fn locator(css: &str, timeout: Duration) -> Locator {
    Locator::new(css).with_timeout(timeout)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Title contains `expected` case-insensitively; no expectation always passes
fn title_matches(actual: &str, expected: Option<&str>) -> bool {
    expected.map_or(true, |e| actual.to_lowercase().contains(&e.to_lowercase()))
}

fn new_result(page_name: &str, data: &WebsiteTestData) -> TestResult {
    TestResult::with_context(format!("{page_name} Verification"), data.test_name.clone())
}

/// Title check against the record's expected title
async fn check_expected_title(
    result: &mut TestResult,
    driver: &dyn PageDriver,
    expected: Option<&str>,
) -> SitecheckResult<()> {
    let actual = driver.title().await?;
    result.add_test(
        "Page Title Check",
        title_matches(&actual, expected),
        format!("Expected: '{}', Actual: '{actual}'", expected.unwrap_or("none")),
    );
    Ok(())
}

/// Title check against a fixed site keyword, then the record's own expectation
async fn check_keyword_title(
    result: &mut TestResult,
    driver: &dyn PageDriver,
    keyword: &str,
    expected: Option<&str>,
) -> SitecheckResult<()> {
    let actual = driver.title().await?;
    let passed = title_matches(&actual, Some(keyword)) && title_matches(&actual, expected);
    result.add_test(
        "Page Title Check",
        passed,
        format!("Expected: title contains '{}', Actual: {actual}", keyword.to_lowercase()),
    );
    Ok(())
}

async fn check_heading(
    result: &mut TestResult,
    driver: &dyn PageDriver,
    description: &str,
    heading: &Locator,
) -> SitecheckResult<()> {
    let text = heading.text_or_empty(driver).await?;
    result.add_test(
        description,
        !text.is_empty(),
        format!("Expected: non-empty title, Actual: '{text}'"),
    );
    Ok(())
}

/// Presence-only check: always passes, records whether the element was there
async fn note_optional(
    result: &mut TestResult,
    driver: &dyn PageDriver,
    description: &str,
    label: &str,
    element: &Locator,
) -> SitecheckResult<()> {
    let present = element.is_displayed(driver).await?;
    result.add_test(description, true, format!("{label} present: {}", yes_no(present)));
    Ok(())
}

/// GitHub landing page
#[derive(Debug, Clone)]
pub struct GitHubHomePage {
    main_heading: Locator,
    sign_up_button: Locator,
    sign_in_button: Locator,
    logo: Locator,
}

impl GitHubHomePage {
    /// Page object with the given wait window
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            main_heading: locator("h1", timeout),
            sign_up_button: locator("a[href='/signup']", timeout),
            sign_in_button: locator("a[href='/login']", timeout),
            logo: locator(".octicon-mark-github", timeout),
        }
    }

    /// Whether the button named by `button_text` is visible.
    ///
    /// Text mentioning "sign up" maps to the signup link and "sign in" to the
    /// login link. With no text, either link being visible is enough.
    pub async fn is_expected_button_visible(
        &self,
        driver: &dyn PageDriver,
        button_text: Option<&str>,
    ) -> SitecheckResult<bool> {
        let sign_up = self.sign_up_button.is_displayed(driver).await?;
        let sign_in = self.sign_in_button.is_displayed(driver).await?;

        let Some(text) = button_text else {
            return Ok(sign_up || sign_in);
        };

        let lower = text.to_lowercase();
        let found = (lower.contains("sign up") && sign_up) || (lower.contains("sign in") && sign_in);
        if !found {
            tracing::debug!(
                button = text,
                sign_up,
                sign_in,
                "expected button not found"
            );
        }
        Ok(found)
    }
}

#[async_trait]
impl Verifiable for GitHubHomePage {
    fn page_name(&self) -> &'static str {
        PageKind::GitHub.type_name()
    }

    fn title_keyword(&self) -> Option<&'static str> {
        Some("GitHub")
    }

    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult> {
        let mut result = new_result(self.page_name(), data);

        check_expected_title(&mut result, driver, data.expected_title.as_deref()).await?;

        let heading = self.main_heading.text_or_empty(driver).await?;
        result.add_test(
            "Main Heading Check",
            !heading.is_empty(),
            format!("Expected: non-empty heading, Actual: '{heading}'"),
        );

        let button = data.button_text.as_deref();
        result.add_test(
            "Expected Button Check",
            self.is_expected_button_visible(driver, button).await?,
            format!("Expected button: '{}'", button.unwrap_or("any")),
        );

        result.add_test(
            "GitHub Logo Check",
            self.logo.is_displayed(driver).await?,
            "Expected: GitHub logo displayed",
        );

        Ok(result)
    }
}

/// junit.org landing page
#[derive(Debug, Clone)]
pub struct JUnitHomePage {
    main_title: Locator,
    guide_link: Locator,
    main_content: Locator,
}

impl JUnitHomePage {
    /// Page object with the given wait window
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            main_title: locator("h1, .hero-title, .main-title", timeout),
            guide_link: locator("a[href*='guide'], .guide-link, nav a", timeout),
            main_content: locator("main, .content, .main-content", timeout),
        }
    }
}

#[async_trait]
impl Verifiable for JUnitHomePage {
    fn page_name(&self) -> &'static str {
        PageKind::JUnit.type_name()
    }

    fn title_keyword(&self) -> Option<&'static str> {
        Some("JUnit")
    }

    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult> {
        let mut result = new_result(self.page_name(), data);
        check_keyword_title(&mut result, driver, "JUnit", data.expected_title.as_deref()).await?;
        check_heading(&mut result, driver, "Main Title Check", &self.main_title).await?;
        note_optional(&mut result, driver, "Guide Link Check", "Guide link", &self.guide_link)
            .await?;
        result.add_test(
            "Main Content Check",
            self.main_content.is_displayed(driver).await?,
            "Expected: Main content area present",
        );
        Ok(result)
    }
}

/// maven.apache.org landing page
#[derive(Debug, Clone)]
pub struct MavenHomePage {
    main_title: Locator,
    download_link: Locator,
    main_content: Locator,
    guide_link: Locator,
}

impl MavenHomePage {
    /// Page object with the given wait window
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            main_title: locator("h1, .hero-title, .main-title", timeout),
            download_link: locator("a[href*='download'], .download-link", timeout),
            main_content: locator("main, .content, .main-content, #bodyColumn", timeout),
            guide_link: locator("a[href*='guide'], .guide-link, nav a", timeout),
        }
    }
}

#[async_trait]
impl Verifiable for MavenHomePage {
    fn page_name(&self) -> &'static str {
        PageKind::Maven.type_name()
    }

    fn title_keyword(&self) -> Option<&'static str> {
        Some("Maven")
    }

    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult> {
        let mut result = new_result(self.page_name(), data);
        check_keyword_title(&mut result, driver, "Maven", data.expected_title.as_deref()).await?;
        check_heading(&mut result, driver, "Main Title Check", &self.main_title).await?;
        result.add_test(
            "Main Content Check",
            self.main_content.is_displayed(driver).await?,
            "Expected: Main content area present",
        );
        note_optional(
            &mut result,
            driver,
            "Download Link Check",
            "Download link",
            &self.download_link,
        )
        .await?;
        note_optional(&mut result, driver, "Guide Link Check", "Guide link", &self.guide_link)
            .await?;
        Ok(result)
    }
}

/// selenium.dev landing page
#[derive(Debug, Clone)]
pub struct SeleniumHomePage {
    main_title: Locator,
    download_link: Locator,
    main_content: Locator,
    documentation_link: Locator,
}

impl SeleniumHomePage {
    /// Page object with the given wait window
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            main_title: locator("h1, .hero-title, .main-title", timeout),
            download_link: locator(
                "a[href*='download'], .download-link, a[href*='getting-started']",
                timeout,
            ),
            main_content: locator("main, .content, .main-content", timeout),
            documentation_link: locator("a[href*='documentation'], .docs-link", timeout),
        }
    }
}

#[async_trait]
impl Verifiable for SeleniumHomePage {
    fn page_name(&self) -> &'static str {
        PageKind::Selenium.type_name()
    }

    fn title_keyword(&self) -> Option<&'static str> {
        Some("Selenium")
    }

    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult> {
        let mut result = new_result(self.page_name(), data);
        check_keyword_title(&mut result, driver, "Selenium", data.expected_title.as_deref())
            .await?;
        check_heading(&mut result, driver, "Main Title Check", &self.main_title).await?;
        result.add_test(
            "Main Content Check",
            self.main_content.is_displayed(driver).await?,
            "Expected: Main content area present",
        );
        note_optional(
            &mut result,
            driver,
            "Download/Getting Started Link Check",
            "Download link",
            &self.download_link,
        )
        .await?;
        note_optional(
            &mut result,
            driver,
            "Documentation Link Check",
            "Documentation link",
            &self.documentation_link,
        )
        .await?;
        Ok(result)
    }
}

/// Any page without a dedicated page object
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPage;

#[async_trait]
impl Verifiable for GenericPage {
    fn page_name(&self) -> &'static str {
        PageKind::Generic.type_name()
    }

    async fn verify(
        &self,
        driver: &dyn PageDriver,
        data: &WebsiteTestData,
    ) -> SitecheckResult<TestResult> {
        let mut result = new_result(self.page_name(), data);

        let title = driver.title().await?;
        let expected = data.expected_title.as_deref();
        result.add_test(
            "Page Title Verification",
            title_matches(&title, expected),
            format!("Expected: '{}', Actual: '{title}'", expected.unwrap_or("none")),
        );

        let url = driver.current_url().await?;
        result.add_test(
            "Page Load Success",
            !url.is_empty(),
            format!("Loaded: {url}"),
        );

        Ok(result)
    }
}

/// Resolves URLs to page objects and performs the load check
#[derive(Debug, Clone, Copy)]
pub struct PageObjectManager {
    timeout: Duration,
    poll_interval: Duration,
}

impl PageObjectManager {
    /// Manager whose page objects wait up to `timeout`
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Page object for a URL without navigating
    #[must_use]
    pub fn page_object(&self, url: &str) -> Box<dyn Verifiable> {
        PageKind::from_url(url).page_object(self.timeout)
    }

    /// Page type name for a URL
    #[must_use]
    pub fn page_type_name(&self, url: &str) -> &'static str {
        PageKind::from_url(url).type_name()
    }

    /// Navigate, resolve the page object and wait for the page to load.
    ///
    /// # Errors
    ///
    /// Navigation failures propagate. A known page whose title never contains
    /// its keyword within the wait window fails with `Timeout`.
    pub async fn navigate_to_page(
        &self,
        driver: &mut dyn PageDriver,
        url: &str,
    ) -> SitecheckResult<Box<dyn Verifiable>> {
        tracing::info!(url, "navigating");
        driver.navigate(url).await?;

        let page = self.page_object(url);
        if let Some(keyword) = page.title_keyword() {
            self.wait_for_title(&*driver, keyword).await?;
        }
        tracing::info!(page = page.page_name(), url, "page loaded");
        Ok(page)
    }

    async fn wait_for_title(&self, driver: &dyn PageDriver, keyword: &str) -> SitecheckResult<()> {
        let start = Instant::now();
        loop {
            let title = driver.title().await?;
            if title_matches(&title, Some(keyword)) {
                return Ok(());
            }
            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(SitecheckError::Timeout {
                    selector: format!("title contains '{keyword}'"),
                    ms: self.timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval.min(self.timeout.saturating_sub(elapsed))).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, MockPage};
    use crate::result::ErrorKind;

    const SHORT: Duration = Duration::from_millis(150);

    fn data(url: &str) -> WebsiteTestData {
        WebsiteTestData::builder()
            .test_name("case")
            .website("Site")
            .website_url(url)
            .build()
            .unwrap()
    }

    fn github_page() -> MockPage {
        MockPage::new("GitHub: Let's build from here")
            .with_element("h1", MockElement::visible("Let's build from here"))
            .with_element("a[href='/signup']", MockElement::visible("Sign up"))
            .with_element("a[href='/login']", MockElement::visible("Sign in"))
            .with_element(".octicon-mark-github", MockElement::visible(""))
    }

    async fn on(url: &str, page: MockPage) -> MockDriver {
        let mut driver = MockDriver::new().with_page(url, page);
        driver.navigate(url).await.unwrap();
        driver
    }

    mod page_kind_tests {
        use super::*;

        #[test]
        fn test_from_url() {
            assert_eq!(PageKind::from_url("https://github.com/login"), PageKind::GitHub);
            assert_eq!(PageKind::from_url("https://junit.org/junit5/"), PageKind::JUnit);
            assert_eq!(PageKind::from_url("https://maven.apache.org"), PageKind::Maven);
            assert_eq!(PageKind::from_url("https://www.selenium.dev"), PageKind::Selenium);
            assert_eq!(PageKind::from_url("https://example.com"), PageKind::Generic);
        }

        #[test]
        fn test_type_names() {
            let manager = PageObjectManager::new(SHORT);
            assert_eq!(manager.page_type_name("https://github.com"), "GitHub HomePage");
            assert_eq!(manager.page_type_name("https://junit.org"), "JUnit HomePage");
            assert_eq!(manager.page_type_name("https://maven.apache.org"), "Maven HomePage");
            assert_eq!(manager.page_type_name("https://selenium.dev"), "Selenium HomePage");
            assert_eq!(manager.page_type_name("https://rust-lang.org"), "Generic Page");
        }

        #[test]
        fn test_page_object_names_match_kind() {
            let manager = PageObjectManager::new(SHORT);
            for url in [
                "https://github.com",
                "https://junit.org",
                "https://maven.apache.org",
                "https://selenium.dev",
                "https://example.com",
            ] {
                assert_eq!(manager.page_object(url).page_name(), manager.page_type_name(url));
            }
        }

        #[test]
        fn test_title_matches() {
            assert!(title_matches("GitHub · Home", Some("github")));
            assert!(title_matches("anything", None));
            assert!(!title_matches("JUnit 5", Some("Maven")));
        }
    }

    mod github_tests {
        use super::*;

        #[tokio::test]
        async fn test_all_checks_pass() {
            let driver = on("https://github.com", github_page()).await;
            let mut record = data("https://github.com");
            record.expected_title = Some("github".to_string());
            record.button_text = Some("Sign up".to_string());

            let result = GitHubHomePage::new(SHORT).verify(&driver, &record).await.unwrap();
            assert_eq!(result.total_tests(), 4);
            assert!(result.all_tests_passed(), "{}", result.detailed_results());
            assert_eq!(result.test_name(), "GitHub HomePage Verification");
            assert_eq!(result.context(), "case");
        }

        #[tokio::test]
        async fn test_title_mismatch_details() {
            let driver = on("https://github.com", github_page()).await;
            let mut record = data("https://github.com");
            record.expected_title = Some("GitLab".to_string());

            let result = GitHubHomePage::new(SHORT).verify(&driver, &record).await.unwrap();
            let failures = result.failures();
            let failure = failures[0];
            assert_eq!(failure.description(), "Page Title Check");
            assert_eq!(
                failure.details(),
                "Expected: 'GitLab', Actual: 'GitHub: Let's build from here'"
            );
        }

        #[tokio::test]
        async fn test_button_mapping() {
            let page = MockPage::new("GitHub")
                .with_element("a[href='/login']", MockElement::visible("Sign in"))
                .with_element("a[href='/signup']", MockElement::hidden());
            let driver = on("https://github.com", page).await;
            let github = GitHubHomePage::new(SHORT);

            assert!(!github.is_expected_button_visible(&driver, Some("Sign up")).await.unwrap());
            assert!(github.is_expected_button_visible(&driver, Some("SIGN IN")).await.unwrap());
            assert!(github.is_expected_button_visible(&driver, None).await.unwrap());
            assert!(!github.is_expected_button_visible(&driver, Some("Pricing")).await.unwrap());
        }

        #[tokio::test]
        async fn test_missing_heading_and_logo_fail() {
            let driver = on("https://github.com", MockPage::new("GitHub")).await;
            let result = GitHubHomePage::new(SHORT)
                .verify(&driver, &data("https://github.com"))
                .await
                .unwrap();
            assert_eq!(result.passed_count(), 1);
            assert_eq!(result.failed_count(), 3);
        }
    }

    mod site_page_tests {
        use super::*;

        #[tokio::test]
        async fn test_junit_optional_guide_link_always_passes() {
            let page = MockPage::new("JUnit 5")
                .with_element("h1, .hero-title, .main-title", MockElement::visible("JUnit 5"))
                .with_element("main, .content, .main-content", MockElement::visible(""));
            let driver = on("https://junit.org", page).await;

            let result = JUnitHomePage::new(SHORT)
                .verify(&driver, &data("https://junit.org"))
                .await
                .unwrap();
            assert!(result.all_tests_passed());
            let guide = result
                .tests()
                .iter()
                .find(|t| t.description() == "Guide Link Check")
                .unwrap();
            assert_eq!(guide.details(), "Guide link present: No");
        }

        #[tokio::test]
        async fn test_maven_title_keyword() {
            let driver = on("https://maven.apache.org", MockPage::new("Welcome to Apache")).await;
            let result = MavenHomePage::new(SHORT)
                .verify(&driver, &data("https://maven.apache.org"))
                .await
                .unwrap();
            assert!(!result.tests()[0].passed());
            assert_eq!(result.total_tests(), 5);
        }

        #[tokio::test]
        async fn test_selenium_checks() {
            let page = MockPage::new("Selenium")
                .with_element("h1, .hero-title, .main-title", MockElement::visible("Selenium automates browsers"))
                .with_element("main, .content, .main-content", MockElement::visible(""))
                .with_element("a[href*='documentation'], .docs-link", MockElement::visible("Docs"));
            let driver = on("https://selenium.dev", page).await;
            let result = SeleniumHomePage::new(SHORT)
                .verify(&driver, &data("https://selenium.dev"))
                .await
                .unwrap();
            assert!(result.all_tests_passed());
            assert!(result.detailed_results().contains("Documentation link present: Yes"));
        }

        #[tokio::test]
        async fn test_generic_page() {
            let driver = on("https://example.com", MockPage::new("Example Domain")).await;
            let mut record = data("https://example.com");

            let result = GenericPage.verify(&driver, &record).await.unwrap();
            assert!(result.all_tests_passed());
            assert_eq!(result.tests()[0].description(), "Page Title Verification");
            assert_eq!(result.tests()[1].description(), "Page Load Success");

            record.expected_title = Some("Other".to_string());
            let result = GenericPage.verify(&driver, &record).await.unwrap();
            assert_eq!(result.failed_count(), 1);
        }
    }

    mod manager_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_to_known_page() {
            let mut driver = MockDriver::new().with_page("https://github.com", github_page());
            let manager = PageObjectManager::new(SHORT);
            let page = manager
                .navigate_to_page(&mut driver, "https://github.com")
                .await
                .unwrap();
            assert_eq!(page.page_name(), "GitHub HomePage");
            assert!(driver.was_called("navigate:https://github.com"));
        }

        #[tokio::test]
        async fn test_load_check_times_out_on_wrong_title() {
            let mut driver =
                MockDriver::new().with_page("https://github.com", MockPage::new("Offline"));
            let manager = PageObjectManager::new(SHORT);
            let err = manager
                .navigate_to_page(&mut driver, "https://github.com")
                .await
                .err()
                .unwrap();
            assert_eq!(err.kind(), ErrorKind::Timeout);
        }

        #[tokio::test]
        async fn test_generic_page_has_no_load_wait() {
            let mut driver =
                MockDriver::new().with_page("https://example.com", MockPage::new(""));
            let manager = PageObjectManager::new(SHORT);
            let page = manager
                .navigate_to_page(&mut driver, "https://example.com")
                .await
                .unwrap();
            assert_eq!(page.page_name(), "Generic Page");
        }

        #[tokio::test]
        async fn test_navigation_failure_propagates() {
            let mut driver = MockDriver::new();
            let manager = PageObjectManager::new(SHORT);
            let err = manager
                .navigate_to_page(&mut driver, "https://github.com")
                .await
                .err()
                .unwrap();
            assert_eq!(err.kind(), ErrorKind::NetworkError);
        }
    }
}
