//! Numbered screenshot files.

use std::path::{Path, PathBuf};

use crate::config::EnvironmentConfig;
use crate::driver::PageDriver;
use crate::result::SitecheckResult;

/// Replace everything but ASCII letters and digits with `_`
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Writes `screenshot_NNN_<name>.png` files with a running counter
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
    enabled: bool,
    counter: u32,
}

impl ScreenshotStore {
    /// Store writing into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
            counter: 0,
        }
    }

    /// Store configured from an environment
    #[must_use]
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.screenshot_dir.clone(), config.screenshot_enabled)
    }

    /// Continue numbering after `count` earlier captures
    #[must_use]
    pub fn continuing_from(mut self, count: u32) -> Self {
        self.counter = count;
        self
    }

    /// Store that never writes
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false)
    }

    /// Whether captures are written
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Output directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.counter
    }

    /// File name the next capture of `name` would get
    #[must_use]
    pub fn next_file_name(&self, name: &str) -> String {
        format!("screenshot_{:03}_{}.png", self.counter + 1, sanitize_name(name))
    }

    /// Write PNG bytes; `None` when disabled
    pub fn save(&mut self, name: &str, png: &[u8]) -> SitecheckResult<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(self.next_file_name(name));
        std::fs::write(&path, png)?;
        self.counter += 1;
        tracing::debug!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(Some(path))
    }

    /// Capture the current page and write it; `None` when disabled
    pub async fn capture(
        &mut self,
        driver: &dyn PageDriver,
        name: &str,
    ) -> SitecheckResult<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        let png = driver.screenshot().await?;
        self.save(name, &png)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockPage};

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("GitHub Homepage (dev)"), "GitHub_Homepage__dev_");
        assert_eq!(sanitize_name("plain123"), "plain123");
    }

    #[test]
    fn test_counter_and_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScreenshotStore::new(dir.path().join("shots"), true);

        let first = store.save("GitHub Home", b"png").unwrap().unwrap();
        let second = store.save("JUnit/Docs", b"png").unwrap().unwrap();

        assert_eq!(first.file_name().unwrap(), "screenshot_001_GitHub_Home.png");
        assert_eq!(second.file_name().unwrap(), "screenshot_002_JUnit_Docs.png");
        assert_eq!(store.count(), 2);
        assert_eq!(std::fs::read(&first).unwrap(), b"png");
    }

    #[test]
    fn test_disabled_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ScreenshotStore::new(dir.path(), false);
        assert!(store.save("x", b"png").unwrap().is_none());
        assert_eq!(store.count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = EnvironmentConfig::defaults("dev")
            .with_screenshot_dir("out")
            .with_screenshots(false);
        let store = ScreenshotStore::from_config(&config);
        assert!(!store.is_enabled());
        assert_eq!(store.dir(), Path::new("out"));
    }

    #[tokio::test]
    async fn test_capture_from_driver() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MockDriver::new().with_page("https://a.test", MockPage::new("A"));
        driver.navigate("https://a.test").await.unwrap();

        let mut store = ScreenshotStore::new(dir.path(), true);
        let path = store.capture(&driver, "a").await.unwrap().unwrap();
        assert!(path.exists());
        assert!(driver.was_called("screenshot"));
    }
}
