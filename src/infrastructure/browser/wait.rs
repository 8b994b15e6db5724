//! Bounded polling waits, the explicit-wait half of the driver contract

use super::{BrowserElement, BrowserError, BrowserResult, BrowserSession, Locator};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll until an element matching `locator` is present on the page
pub async fn wait_for_element<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    timeout: Duration,
) -> BrowserResult<S::Element> {
    let deadline = Instant::now() + timeout;
    loop {
        match session.find_element(locator).await {
            Ok(element) => return Ok(element),
            Err(e) if e.is_not_found() => trace!("{} not present yet", locator),
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::timeout(
                format!("presence of {locator}"),
                timeout,
            ));
        }
        sleep(DEFAULT_POLL_INTERVAL).await;
    }
}

/// Poll until `element` is visible and enabled
pub async fn wait_until_clickable<E: BrowserElement>(
    element: &E,
    what: &str,
    timeout: Duration,
) -> BrowserResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if element.is_clickable().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::timeout(format!("{what} to be clickable"), timeout));
        }
        trace!("{} not clickable yet", what);
        sleep(DEFAULT_POLL_INTERVAL).await;
    }
}
