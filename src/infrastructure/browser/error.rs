//! Errors raised while driving the browser

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BrowserError {
    #[error("Element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser driver error: {0}")]
    Driver(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),
}

impl BrowserError {
    pub fn not_found(locator: impl ToString) -> Self {
        Self::ElementNotFound {
            locator: locator.to_string(),
        }
    }

    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout,
        }
    }

    pub fn driver(err: impl ToString) -> Self {
        Self::Driver(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type BrowserResult<T> = Result<T, BrowserError>;
