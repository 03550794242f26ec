//! Per-environment configuration.
//!
//! Each environment (`dev`, `staging`, `prod`, ...) is described by a YAML file
//! named `<env>.yaml` inside a configuration directory:
//!
//! ```yaml
//! base_url: https://staging.example.com
//! timeout_seconds: 15
//! screenshot_enabled: true
//! headless: true
//! screenshot_dir: target/screenshots/staging
//! ```
//!
//! `base_url` anchors record URLs that carry no scheme (`/features`,
//! `docs/index.html`); absolute URLs are used as given.
//!
//! Values are explicit: a config is loaded once and passed to whatever needs
//! it. A missing file is not an error, the defaults are used instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::result::{SitecheckError, SitecheckResult};

/// Default base URL when none is configured
pub const DEFAULT_BASE_URL: &str = "https://";

/// Default element wait in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Default screenshot directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Environment-specific settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment name, taken from the file name
    #[serde(skip)]
    pub name: String,
    /// Base URL of the system under test
    pub base_url: String,
    /// Bounded-wait timeout for element interactions
    pub timeout_seconds: u64,
    /// Capture a screenshot after each verification
    pub screenshot_enabled: bool,
    /// Run the browser headless; unset means headless only for `prod`
    pub headless: Option<bool>,
    /// Where screenshots are written
    pub screenshot_dir: PathBuf,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::defaults("dev")
    }
}

impl EnvironmentConfig {
    /// Built-in defaults for an environment
    #[must_use]
    pub fn defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            screenshot_enabled: true,
            headless: None,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
        }
    }

    /// Load `<dir>/<env>.yaml`, falling back to defaults when the file is absent
    ///
    /// # Errors
    ///
    /// Returns a parse error if the file exists but is not valid YAML for
    /// this structure, or an I/O error if it cannot be read.
    pub fn load(dir: impl AsRef<Path>, env: &str) -> SitecheckResult<Self> {
        let path = dir.as_ref().join(format!("{env}.yaml"));
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                env,
                "environment config not found, using defaults"
            );
            return Ok(Self::defaults(env));
        }

        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_yaml(&content, &path.display().to_string())?;
        config.name = env.to_string();
        tracing::info!(path = %path.display(), env, "loaded environment config");
        Ok(config)
    }

    /// Parse a YAML document; `source_name` labels parse errors
    ///
    /// # Errors
    ///
    /// Returns a parse error on malformed YAML or invalid values
    pub fn from_yaml(content: &str, source_name: &str) -> SitecheckResult<Self> {
        // An empty document is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(content)
            .map_err(|e| SitecheckError::parse(source_name, e.to_string()))?;
        if config.timeout_seconds == 0 {
            return Err(SitecheckError::parse(
                source_name,
                "timeout_seconds must be greater than zero",
            ));
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Enable or disable screenshots
    #[must_use]
    pub const fn with_screenshots(mut self, enabled: bool) -> Self {
        self.screenshot_enabled = enabled;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Force headless on or off
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    /// Element wait as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Resolve a record URL against `base_url`.
    ///
    /// URLs with a scheme are returned unchanged.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") {
            return url.to_string();
        }
        let path = url.trim_start_matches('/');
        if self.base_url.ends_with("://") {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url.trim_end_matches('/'))
        }
    }

    /// Effective headless setting
    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless.unwrap_or(self.name == "prod")
    }
}
