//! Real browser control via chromiumoxide.
//!
//! [`ChromiumDriver`] implements [`PageDriver`] over the Chrome DevTools
//! Protocol. Element probes are a single JavaScript evaluation each.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::config::EnvironmentConfig;
use crate::driver::{ElementState, PageDriver};
use crate::locator::Selector;
use crate::result::{SitecheckError, SitecheckResult};

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Keep the Chromium sandbox enabled
    pub sandbox: bool,
    /// Explicit Chromium executable
    pub chromium_path: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chromium_path: None,
        }
    }
}

impl BrowserOptions {
    /// Options derived from an environment configuration
    #[must_use]
    pub fn from_env_config(config: &EnvironmentConfig) -> Self {
        Self {
            headless: config.headless(),
            ..Self::default()
        }
    }

    /// Disable the sandbox (required in most containers)
    #[must_use]
    pub fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Use a specific Chromium binary
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}

/// JavaScript returning an [`ElementState`] for the element `query` resolves to
fn state_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; \
         if (!el) return {{ present: false, visible: false, text: '' }}; \
         const r = el.getBoundingClientRect(); \
         const s = window.getComputedStyle(el); \
         const visible = r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; \
         return {{ present: true, visible, text: (el.textContent || '').trim() }}; }})()",
        selector.to_query()
    )
}

fn click_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
        selector.to_query()
    )
}

fn type_script(selector: &Selector, text: &str) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.focus(); el.value = {text:?}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
        selector.to_query()
    )
}

/// Page driver backed by a real Chromium instance
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<CdpPage>>,
    handle: tokio::task::JoinHandle<()>,
    url: String,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(options: &BrowserOptions) -> SitecheckResult<Self> {
        let mut builder = CdpConfig::builder();

        if !options.headless {
            builder = builder.with_head();
        }

        if !options.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(SitecheckError::browser)?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(|e| SitecheckError::browser(e.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SitecheckError::browser(e.to_string()))?;

        tracing::info!(headless = options.headless, "browser launched");

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(page)),
            handle,
            url: String::from("about:blank"),
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> SitecheckResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| SitecheckError::browser(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| SitecheckError::browser(e.to_string()))
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> SitecheckResult<()> {
        {
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| SitecheckError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
        }
        tracing::debug!(url, "navigated");
        self.url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> SitecheckResult<String> {
        self.eval("document.title").await
    }

    async fn current_url(&self) -> SitecheckResult<String> {
        match self.eval::<String>("window.location.href").await {
            Ok(href) => Ok(href),
            Err(_) => Ok(self.url.clone()),
        }
    }

    async fn query(&self, selector: &Selector) -> SitecheckResult<ElementState> {
        self.eval(&state_script(selector)).await
    }

    async fn click(&self, selector: &Selector) -> SitecheckResult<()> {
        if self.eval::<bool>(&click_script(selector)).await? {
            Ok(())
        } else {
            Err(SitecheckError::ElementNotFound {
                selector: selector.to_string(),
                waited_ms: 0,
            })
        }
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> SitecheckResult<()> {
        if self.eval::<bool>(&type_script(selector, text)).await? {
            Ok(())
        } else {
            Err(SitecheckError::ElementNotFound {
                selector: selector.to_string(),
                waited_ms: 0,
            })
        }
    }

    async fn screenshot(&self) -> SitecheckResult<Vec<u8>> {
        let page = self.page.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| SitecheckError::browser(e.to_string()))?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| SitecheckError::browser(e.to_string()))
    }

    async fn close(&mut self) -> SitecheckResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| SitecheckError::browser(e.to_string()))?;
        self.handle.abort();
        Ok(())
    }
}
