//! Page driver abstraction.
//!
//! [`PageDriver`] is the seam between page objects and whatever is actually
//! rendering pages. Each method is a single probe or action; bounded waiting
//! lives in [`crate::locator::Locator`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  PageDriver (async trait)                                │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐     ┌─────────────────────┐     │
//! │  │  ChromiumDriver     │     │  MockDriver         │     │
//! │  │  (feature browser)  │     │  (tests, dry runs)  │     │
//! │  │  CDP via            │     │  in-memory pages    │     │
//! │  │  chromiumoxide      │     │  keyed by URL       │     │
//! │  └─────────────────────┘     └─────────────────────┘     │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::locator::Selector;
use crate::result::{SitecheckError, SitecheckResult};

/// PNG signature returned by mock screenshots
pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Result of one non-waiting element probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Element exists in the DOM
    pub present: bool,
    /// Element is rendered and has a non-empty box
    pub visible: bool,
    /// Trimmed text content
    pub text: String,
}

impl ElementState {
    /// State for an element that does not exist
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Abstract driver for page interaction.
///
/// # Implementations
///
/// - `ChromiumDriver` - real browser over CDP (feature `browser`)
/// - `MockDriver` - in-memory pages for tests and `--dry-run`
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> SitecheckResult<()>;

    /// Current document title
    async fn title(&self) -> SitecheckResult<String>;

    /// Current URL
    async fn current_url(&self) -> SitecheckResult<String>;

    /// Probe one element without waiting
    async fn query(&self, selector: &Selector) -> SitecheckResult<ElementState>;

    /// Click element
    async fn click(&self, selector: &Selector) -> SitecheckResult<()>;

    /// Type text into element
    async fn type_text(&self, selector: &Selector, text: &str) -> SitecheckResult<()>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> SitecheckResult<Vec<u8>>;

    /// Release the underlying session
    async fn close(&mut self) -> SitecheckResult<()> {
        Ok(())
    }
}

/// Element on a [`MockPage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    visible: bool,
    text: String,
    revealed_after: u32,
}

impl MockElement {
    /// Visible element with text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            text: text.into(),
            revealed_after: 0,
        }
    }

    /// Element present in the DOM but never visible
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            text: String::new(),
            revealed_after: 0,
        }
    }

    /// Element only exists after `probes` queries have been made for it
    #[must_use]
    pub const fn revealed_after(mut self, probes: u32) -> Self {
        self.revealed_after = probes;
        self
    }
}

/// In-memory page served by [`MockDriver`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPage {
    title: String,
    elements: HashMap<String, MockElement>,
}

impl MockPage {
    /// Page with a title and no elements
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: HashMap::new(),
        }
    }

    /// Add an element addressed by the selector's display form
    #[must_use]
    pub fn with_element(mut self, selector: impl Into<String>, element: MockElement) -> Self {
        self.elements.insert(selector.into(), element);
        self
    }
}

/// Mock driver serving in-memory pages keyed by URL
#[derive(Debug)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    current_url: Option<String>,
    screenshot_data: Vec<u8>,
    probes: Mutex<HashMap<String, u32>>,
    call_history: Mutex<Vec<String>>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
            current_url: None,
            screenshot_data: PNG_MAGIC.to_vec(),
            probes: Mutex::new(HashMap::new()),
            call_history: Mutex::new(Vec::new()),
        }
    }
}

impl MockDriver {
    /// Create new mock driver with no pages
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page at a URL
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, page: MockPage) -> Self {
        self.add_page(url, page);
        self
    }

    /// Register a page at a URL
    pub fn add_page(&mut self, url: impl Into<String>, page: MockPage) {
        self.pages.insert(url.into(), page);
    }

    /// Override the screenshot bytes
    #[must_use]
    pub fn with_screenshot(mut self, data: Vec<u8>) -> Self {
        self.screenshot_data = data;
        self
    }

    /// Recorded calls, e.g. `navigate:https://github.com`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    /// Check if a call with this prefix was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    /// Number of recorded calls equal to `call`
    #[must_use]
    pub fn count_calls(&self, call: &str) -> usize {
        self.history().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: String) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(call);
        }
    }

    fn page(&self) -> SitecheckResult<&MockPage> {
        let url = self
            .current_url
            .as_deref()
            .ok_or_else(|| SitecheckError::PageNotFound {
                url: "about:blank".to_string(),
            })?;
        self.pages
            .get(url)
            .ok_or_else(|| SitecheckError::PageNotFound {
                url: url.to_string(),
            })
    }

    fn probe(&self, key: &str) -> u32 {
        self.probes.lock().map_or(0, |mut probes| {
            let count = probes.entry(key.to_string()).or_insert(0);
            *count += 1;
            *count
        })
    }

    fn require_element(&self, selector: &Selector) -> SitecheckResult<()> {
        let key = selector.to_string();
        if self.page()?.elements.contains_key(&key) {
            Ok(())
        } else {
            Err(SitecheckError::ElementNotFound {
                selector: key,
                waited_ms: 0,
            })
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> SitecheckResult<()> {
        self.record(format!("navigate:{url}"));
        if !self.pages.contains_key(url) {
            return Err(SitecheckError::Navigation {
                url: url.to_string(),
                message: "no mock page registered".to_string(),
            });
        }
        self.current_url = Some(url.to_string());
        if let Ok(mut probes) = self.probes.lock() {
            probes.clear();
        }
        Ok(())
    }

    async fn title(&self) -> SitecheckResult<String> {
        Ok(self.page()?.title.clone())
    }

    async fn current_url(&self) -> SitecheckResult<String> {
        Ok(self.current_url.clone().unwrap_or_default())
    }

    async fn query(&self, selector: &Selector) -> SitecheckResult<ElementState> {
        let key = selector.to_string();
        let Some(element) = self.page()?.elements.get(&key) else {
            return Ok(ElementState::absent());
        };
        if self.probe(&key) <= element.revealed_after {
            return Ok(ElementState::absent());
        }
        Ok(ElementState {
            present: true,
            visible: element.visible,
            text: element.text.trim().to_string(),
        })
    }

    async fn click(&self, selector: &Selector) -> SitecheckResult<()> {
        self.require_element(selector)?;
        self.record(format!("click:{selector}"));
        Ok(())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> SitecheckResult<()> {
        self.require_element(selector)?;
        self.record(format!("type:{selector}"));
        tracing::trace!(selector = %selector, len = text.len(), "mock typed text");
        Ok(())
    }

    async fn screenshot(&self) -> SitecheckResult<Vec<u8>> {
        self.page()?;
        self.record("screenshot".to_string());
        Ok(self.screenshot_data.clone())
    }
}
