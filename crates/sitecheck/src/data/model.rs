//! Test data records and their builders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::result::{SitecheckError, SitecheckResult};

/// Default environment for records that do not name one
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Test priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Smoke-test candidates
    High,
    /// Regular coverage
    #[default]
    Medium,
    /// Nice-to-have
    Low,
}

impl Priority {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = SitecheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(SitecheckError::parse(
                "priority",
                format!("unknown priority '{other}' (expected high, medium or low)"),
            )),
        }
    }
}

/// Derive a URL from a well-known website name
#[must_use]
pub fn website_url_for(website: &str) -> String {
    let lower = website.trim().to_lowercase();
    match lower.as_str() {
        "github" => "https://github.com".to_string(),
        "junit" => "https://junit.org".to_string(),
        "maven" => "https://maven.apache.org".to_string(),
        "selenium" => "https://selenium.dev".to_string(),
        _ => format!("https://{lower}.com"),
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> SitecheckResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(SitecheckError::MissingField { field }),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A named link to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    /// Display name
    pub name: String,
    /// Target URL
    pub url: String,
    /// Expected substring of the page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_title: Option<String>,
}

impl LinkData {
    /// Start building a link
    #[must_use]
    pub fn builder() -> LinkDataBuilder {
        LinkDataBuilder::default()
    }

    /// Convert to a website record named `<name>_JSON_Test` in `dev` at medium priority
    #[must_use]
    pub fn into_test_data(self) -> WebsiteTestData {
        WebsiteTestData {
            test_name: format!("{}_JSON_Test", self.name),
            website_url: self.url,
            website: self.name,
            expected_title: self.expected_title,
            button_text: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            priority: Priority::Medium,
        }
    }
}

/// Builder for [`LinkData`]
#[derive(Debug, Clone, Default)]
pub struct LinkDataBuilder {
    name: Option<String>,
    url: Option<String>,
    expected_title: Option<String>,
}

impl LinkDataBuilder {
    /// Set the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the expected title
    #[must_use]
    pub fn expected_title(mut self, title: impl Into<String>) -> Self {
        self.expected_title = Some(title.into());
        self
    }

    /// Build the link
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when name or url is absent or blank
    pub fn build(self) -> SitecheckResult<LinkData> {
        Ok(LinkData {
            name: non_empty(self.name, "name")?,
            url: non_empty(self.url, "url")?,
            expected_title: optional(self.expected_title),
        })
    }
}

/// One data-driven website check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteTestData {
    /// Test name
    pub test_name: String,
    /// Website name (e.g. "GitHub")
    pub website: String,
    /// URL to open
    pub website_url: String,
    /// Expected substring of the page title
    pub expected_title: Option<String>,
    /// Button expected on the page
    pub button_text: Option<String>,
    /// Target environment
    pub environment: String,
    /// Priority
    pub priority: Priority,
}

impl WebsiteTestData {
    /// Start building a record
    #[must_use]
    pub fn builder() -> WebsiteTestDataBuilder {
        WebsiteTestDataBuilder::default()
    }
}

impl fmt::Display for WebsiteTestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} [{}/{}]",
            self.test_name, self.website, self.website_url, self.environment, self.priority
        )
    }
}

/// Builder for [`WebsiteTestData`].
///
/// Setting the website derives its URL; an explicit `website_url` set
/// afterwards (or before) wins.
#[derive(Debug, Clone, Default)]
pub struct WebsiteTestDataBuilder {
    test_name: Option<String>,
    website: Option<String>,
    website_url: Option<String>,
    expected_title: Option<String>,
    button_text: Option<String>,
    environment: Option<String>,
    priority: Priority,
}

impl WebsiteTestDataBuilder {
    /// Set the test name
    #[must_use]
    pub fn test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Set the website name
    #[must_use]
    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Set an explicit URL
    #[must_use]
    pub fn website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }

    /// Set the expected title
    #[must_use]
    pub fn expected_title(mut self, title: impl Into<String>) -> Self {
        self.expected_title = Some(title.into());
        self
    }

    /// Set the expected title when present
    #[must_use]
    pub fn maybe_expected_title(mut self, title: Option<String>) -> Self {
        self.expected_title = title;
        self
    }

    /// Set the expected button text
    #[must_use]
    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = Some(text.into());
        self
    }

    /// Set the environment
    #[must_use]
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Build the record
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when test name or website is absent or blank
    pub fn build(self) -> SitecheckResult<WebsiteTestData> {
        let test_name = non_empty(self.test_name, "testName")?;
        let website = non_empty(self.website, "website")?;
        let website_url =
            optional(self.website_url).unwrap_or_else(|| website_url_for(&website));
        let environment =
            optional(self.environment).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Ok(WebsiteTestData {
            test_name,
            website,
            website_url,
            expected_title: optional(self.expected_title),
            button_text: optional(self.button_text),
            environment,
            priority: self.priority,
        })
    }
}
