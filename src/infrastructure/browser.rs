//! Browser automation seam
//!
//! Source parsers talk to the browser only through [`BrowserSession`] and
//! [`BrowserElement`], so a scrape pass can run against headless Chromium
//! ([`ChromiumSession`]) or against HTML fixtures through `test_utils`.

pub mod chromium;
pub mod error;
pub mod locator;
pub mod wait;

pub use chromium::{ChromiumElement, ChromiumSession, LaunchOptions};
pub use error::{BrowserError, BrowserResult};
pub use locator::Locator;
pub use wait::{wait_for_element, wait_until_clickable, DEFAULT_POLL_INTERVAL};

use async_trait::async_trait;
use std::time::Duration;

/// A handle to one element of the current page
#[async_trait]
pub trait BrowserElement: Send + Sync + Sized {
    /// Rendered text, trimmed
    async fn text(&self) -> BrowserResult<String>;

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>>;

    /// First descendant matching `locator`
    async fn find_element(&self, locator: &Locator) -> BrowserResult<Self>;

    /// All descendants matching `locator`, in document order
    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<Self>>;

    async fn click(&self) -> BrowserResult<()>;

    /// Visible and enabled
    async fn is_clickable(&self) -> BrowserResult<bool>;

    /// Text of the currently selected `<option>` of a `<select>` element
    async fn selected_option_text(&self) -> BrowserResult<String>;

    /// Select the `<option>` whose value is `value`
    async fn select_by_value(&self, value: &str) -> BrowserResult<()>;

    async fn send_keys(&self, text: &str) -> BrowserResult<()>;
}

/// A browser session owned by exactly one parser for one pass
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: BrowserElement;

    fn set_page_load_timeout(&mut self, timeout: Duration);

    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    async fn find_element(&self, locator: &Locator) -> BrowserResult<Self::Element>;

    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<Self::Element>>;

    /// Close the page and quit the browser. Idempotent.
    async fn close(&mut self) -> BrowserResult<()>;
}
