//! Headless Chromium session over the DevTools protocol (chromiumoxide)

use super::{BrowserElement, BrowserError, BrowserResult, BrowserSession, Locator};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

const IS_CLICKABLE_JS: &str = r"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return !this.disabled
        && rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}";

const SELECTED_OPTION_TEXT_JS: &str = r"function() {
    if (!this.options) { return null; }
    const option = this.options[this.selectedIndex];
    return option ? option.text : null;
}";

/// How to launch the browser process
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Show the browser window instead of running headless
    pub headful: bool,
    /// Directory the browser saves downloads into
    pub download_dir: Option<PathBuf>,
    /// Explicit Chrome/Chromium executable; autodetected when `None`
    pub executable: Option<PathBuf>,
}

/// A single browser with a single page, owned by one parser pass
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    page_load_timeout: Duration,
    closed: bool,
}

impl ChromiumSession {
    /// Launch a browser process and open a blank page
    pub async fn launch(options: LaunchOptions) -> BrowserResult<Self> {
        let mut builder = BrowserConfig::builder();
        if options.headful {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(BrowserError::Driver)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(BrowserError::driver)?;

        // The CDP connection only makes progress while its handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(BrowserError::driver)?;

        if let Some(dir) = &options.download_dir {
            let mut params = SetDownloadBehaviorParams::new(SetDownloadBehaviorBehavior::Allow);
            params.download_path = Some(dir.to_string_lossy().into_owned());
            browser.execute(params).await.map_err(BrowserError::driver)?;
            debug!("Downloads directed to {:?}", dir);
        }

        info!("Chromium session started (headful: {})", options.headful);

        Ok(Self {
            browser,
            page,
            handler,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
            closed: false,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Element = ChromiumElement;

    fn set_page_load_timeout(&mut self, timeout: Duration) {
        self.page_load_timeout = timeout;
    }

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        debug!("Navigating to {}", url);
        match tokio::time::timeout(self.page_load_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::timeout(
                format!("page load of {url}"),
                self.page_load_timeout,
            )),
        }
    }

    async fn find_element(&self, locator: &Locator) -> BrowserResult<ChromiumElement> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::not_found(locator))
    }

    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<ChromiumElement>> {
        let elements = self
            .page
            .find_elements(locator.to_css())
            .await
            .map_err(BrowserError::driver)?;
        Ok(elements.into_iter().map(ChromiumElement::new).collect())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await.map_err(BrowserError::driver);
        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        debug!("Chromium session closed");
        closed.map(|_| ())
    }
}

/// Element handle backed by a DevTools remote object
#[derive(Debug)]
pub struct ChromiumElement {
    inner: Element,
}

impl ChromiumElement {
    fn new(inner: Element) -> Self {
        Self { inner }
    }

    async fn call_for_value(&self, function: String) -> BrowserResult<serde_json::Value> {
        let returns = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(returns.result.value.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl BrowserElement for ChromiumElement {
    async fn text(&self) -> BrowserResult<String> {
        let text = self.inner.inner_text().await.map_err(BrowserError::driver)?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        self.inner.attribute(name).await.map_err(BrowserError::driver)
    }

    async fn find_element(&self, locator: &Locator) -> BrowserResult<Self> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::not_found(locator))
    }

    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<Self>> {
        let elements = self
            .inner
            .find_elements(locator.to_css())
            .await
            .map_err(BrowserError::driver)?;
        Ok(elements.into_iter().map(Self::new).collect())
    }

    async fn click(&self) -> BrowserResult<()> {
        self.inner.click().await.map_err(BrowserError::driver)?;
        Ok(())
    }

    async fn is_clickable(&self) -> BrowserResult<bool> {
        let value = self.call_for_value(IS_CLICKABLE_JS.to_string()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn selected_option_text(&self) -> BrowserResult<String> {
        let value = self.call_for_value(SELECTED_OPTION_TEXT_JS.to_string()).await?;
        value
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| BrowserError::not_found("selected option"))
    }

    async fn select_by_value(&self, value: &str) -> BrowserResult<()> {
        let literal = serde_json::to_string(value).map_err(|e| BrowserError::Script(e.to_string()))?;
        let function = format!(
            r"function() {{
    const wanted = {literal};
    const option = Array.from(this.options || []).find(o => o.value === wanted);
    if (!option) {{ return false; }}
    this.value = wanted;
    this.dispatchEvent(new Event('input', {{ bubbles: true }}));
    this.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}}"
        );
        match self.call_for_value(function).await?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(BrowserError::not_found(format!("option[value={value}]"))),
        }
    }

    async fn send_keys(&self, text: &str) -> BrowserResult<()> {
        self.inner.focus().await.map_err(BrowserError::driver)?;
        self.inner.type_str(text).await.map_err(BrowserError::driver)?;
        Ok(())
    }
}
