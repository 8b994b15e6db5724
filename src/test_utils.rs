//! Test utilities for the scraper plugin
//!
//! [`FakeSession`] implements the browser traits over a static HTML page
//! parsed with `scraper`, so parser passes can be exercised without a
//! browser. Sessions are cheap clones sharing one page and one call log:
//! keep a clone to inspect what a parser did after handing the session over.
//!
//! Elements carrying a `disabled` or `hidden` attribute are not clickable.
//! Selections and typed text live in side tables next to the page source.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::infrastructure::browser::{
    BrowserElement, BrowserError, BrowserResult, BrowserSession, Locator,
};

/// Element handle: position among the page's elements in document order
type NodeId = usize;

#[derive(Debug)]
struct FakePage {
    source: String,
    /// `<select>` node -> chosen option value
    selections: HashMap<NodeId, String>,
    /// input node -> text typed so far
    typed: HashMap<NodeId, String>,
}

/// One option of a `<select>`
struct OptionEntry {
    value: String,
    text: String,
    preselected: bool,
}

impl FakePage {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            selections: HashMap::new(),
            typed: HashMap::new(),
        }
    }

    /// Parse the page and hand `f` the element behind `node`
    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(ElementRef<'_>) -> R) -> BrowserResult<R> {
        let html = Html::parse_fragment(&self.source);
        let element = elements(&html)
            .into_iter()
            .nth(node)
            .ok_or_else(|| BrowserError::driver(format!("stale element #{node}")))?;
        Ok(f(element))
    }

    /// Matches in document order; `scope` restricts them to its descendants
    fn query(&self, scope: Option<NodeId>, locator: &Locator) -> BrowserResult<Vec<NodeId>> {
        let css = locator.to_css();
        let selector = Selector::parse(&css)
            .map_err(|e| BrowserError::Script(format!("invalid selector '{css}': {e:?}")))?;

        let html = Html::parse_fragment(&self.source);
        let all = elements(&html);
        let found: Vec<ElementRef<'_>> = match scope {
            None => html.select(&selector).collect(),
            Some(node) => all
                .get(node)
                .ok_or_else(|| BrowserError::driver(format!("stale element #{node}")))?
                .select(&selector)
                .collect(),
        };
        Ok(found
            .iter()
            .filter_map(|element| all.iter().position(|candidate| candidate == element))
            .collect())
    }

    fn text(&self, node: NodeId) -> BrowserResult<String> {
        self.with_element(node, inner_text)
    }

    fn attribute(&self, node: NodeId, name: &str) -> BrowserResult<Option<String>> {
        if name == "value" {
            if let Some(typed) = self.typed.get(&node) {
                return Ok(Some(typed.clone()));
            }
        }
        self.with_element(node, |element| element.value().attr(name).map(str::to_string))
    }

    fn is_clickable(&self, node: NodeId) -> BrowserResult<bool> {
        self.with_element(node, |element| {
            let attrs = element.value();
            attrs.attr("disabled").is_none() && attrs.attr("hidden").is_none()
        })
    }

    fn describe(&self, node: NodeId) -> BrowserResult<String> {
        self.with_element(node, |element| {
            let value = element.value();
            match value.id() {
                Some(id) => format!("{}#{}", value.name(), id),
                None => value
                    .classes()
                    .fold(value.name().to_string(), |acc, class| format!("{acc}.{class}")),
            }
        })
    }

    fn options(&self, node: NodeId) -> BrowserResult<Vec<OptionEntry>> {
        let option_selector = Selector::parse("option")
            .map_err(|e| BrowserError::Script(format!("invalid selector 'option': {e:?}")))?;
        self.with_element(node, |element| {
            if element.value().name() != "select" {
                return Err(BrowserError::Script(format!(
                    "<{}> is not a select element",
                    element.value().name()
                )));
            }
            Ok(element
                .select(&option_selector)
                .map(|option| OptionEntry {
                    value: option.value().attr("value").unwrap_or_default().to_string(),
                    text: inner_text(option),
                    preselected: option.value().attr("selected").is_some(),
                })
                .collect())
        })?
    }
}

fn elements(html: &Html) -> Vec<ElementRef<'_>> {
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect()
}

/// Trimmed text runs joined by newlines, like a rendered block's `innerText`
fn inner_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything a parser did to the fake browser
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    pub navigations: Vec<String>,
    pub page_load_timeout: Option<Duration>,
    pub clicks: Vec<String>,
    pub selections: Vec<(String, String)>,
    pub typed: Vec<(String, String)>,
    pub close_calls: usize,
}

/// In-memory [`BrowserSession`] over a fixed HTML page
#[derive(Debug, Clone)]
pub struct FakeSession {
    page: Arc<Mutex<FakePage>>,
    log: Arc<Mutex<SessionLog>>,
    fail_navigation: bool,
}

impl FakeSession {
    /// Session whose current page is the HTML fragment `html`
    pub fn new(html: &str) -> Self {
        Self {
            page: Arc::new(Mutex::new(FakePage::new(html))),
            log: Arc::new(Mutex::new(SessionLog::default())),
            fail_navigation: false,
        }
    }

    /// Every navigation fails as if the page never loaded
    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn log(&self) -> SessionLog {
        lock(&self.log).clone()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.log).close_calls > 0
    }

    fn element(&self, node: NodeId) -> FakeElement {
        FakeElement {
            page: Arc::clone(&self.page),
            log: Arc::clone(&self.log),
            node,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = FakeElement;

    fn set_page_load_timeout(&mut self, timeout: Duration) {
        lock(&self.log).page_load_timeout = Some(timeout);
    }

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        lock(&self.log).navigations.push(url.to_string());
        if self.fail_navigation {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        Ok(())
    }

    async fn find_element(&self, locator: &Locator) -> BrowserResult<FakeElement> {
        let found = lock(&self.page).query(None, locator)?;
        found
            .first()
            .map(|&node| self.element(node))
            .ok_or_else(|| BrowserError::not_found(locator))
    }

    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<FakeElement>> {
        let found = lock(&self.page).query(None, locator)?;
        Ok(found.into_iter().map(|node| self.element(node)).collect())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        lock(&self.log).close_calls += 1;
        Ok(())
    }
}

/// Element of a [`FakeSession`] page
#[derive(Debug, Clone)]
pub struct FakeElement {
    page: Arc<Mutex<FakePage>>,
    log: Arc<Mutex<SessionLog>>,
    node: NodeId,
}

impl FakeElement {
    fn sibling(&self, node: NodeId) -> Self {
        Self {
            page: Arc::clone(&self.page),
            log: Arc::clone(&self.log),
            node,
        }
    }
}

#[async_trait]
impl BrowserElement for FakeElement {
    async fn text(&self) -> BrowserResult<String> {
        lock(&self.page).text(self.node)
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        lock(&self.page).attribute(self.node, name)
    }

    async fn find_element(&self, locator: &Locator) -> BrowserResult<Self> {
        let found = lock(&self.page).query(Some(self.node), locator)?;
        found
            .first()
            .map(|&node| self.sibling(node))
            .ok_or_else(|| BrowserError::not_found(locator))
    }

    async fn find_elements(&self, locator: &Locator) -> BrowserResult<Vec<Self>> {
        let found = lock(&self.page).query(Some(self.node), locator)?;
        Ok(found.into_iter().map(|node| self.sibling(node)).collect())
    }

    async fn click(&self) -> BrowserResult<()> {
        let page = lock(&self.page);
        let target = page.describe(self.node)?;
        if !page.is_clickable(self.node)? {
            return Err(BrowserError::Driver(format!("element not interactable: {target}")));
        }
        lock(&self.log).clicks.push(target);
        Ok(())
    }

    async fn is_clickable(&self) -> BrowserResult<bool> {
        lock(&self.page).is_clickable(self.node)
    }

    async fn selected_option_text(&self) -> BrowserResult<String> {
        let page = lock(&self.page);
        let options = page.options(self.node)?;
        let chosen = page.selections.get(&self.node);
        options
            .iter()
            .find(|option| chosen.is_some_and(|value| *value == option.value))
            .or_else(|| options.iter().find(|option| option.preselected))
            .or_else(|| options.first())
            .map(|option| option.text.clone())
            .ok_or_else(|| BrowserError::not_found("selected option"))
    }

    async fn select_by_value(&self, value: &str) -> BrowserResult<()> {
        let mut page = lock(&self.page);
        if !page.options(self.node)?.iter().any(|option| option.value == value) {
            return Err(BrowserError::not_found(format!("option[value={value}]")));
        }
        page.selections.insert(self.node, value.to_string());
        let target = page.describe(self.node)?;
        lock(&self.log).selections.push((target, value.to_string()));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> BrowserResult<()> {
        let mut page = lock(&self.page);
        let target = page.describe(self.node)?;
        page.typed.entry(self.node).or_default().push_str(text);
        lock(&self.log).typed.push((target, text.to_string()));
        Ok(())
    }
}
