//! Error types for a scrape pass
//!
//! Anything surfacing as a [`ParserError`] aborts the pass; the host treats
//! it as "this source produced nothing this run". Unparseable version or
//! date strings are not errors (see `parsing::version_date`).

use crate::infrastructure::browser::BrowserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Required attribute '{attribute}' missing on {context}")]
    MissingAttribute { attribute: String, context: String },

    #[error("Invalid document link '{link}': {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ParserError {
    /// Create a missing attribute error naming the element it was read from
    pub fn missing_attribute(attribute: &str, context: &str) -> Self {
        Self::MissingAttribute {
            attribute: attribute.to_string(),
            context: context.to_string(),
        }
    }

    pub fn invalid_link(link: &str, reason: impl ToString) -> Self {
        Self::InvalidLink {
            link: link.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Element lookups and waits that failed inside the main walk
    pub fn is_page_structure_error(&self) -> bool {
        matches!(
            self,
            Self::Browser(BrowserError::ElementNotFound { .. } | BrowserError::Timeout { .. })
        )
    }
}

pub type ParserResult<T> = Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn browser_lookup_failures_are_page_structure_errors() {
        let not_found: ParserError = BrowserError::not_found("id=results").into();
        let timeout: ParserError = BrowserError::timeout("results", Duration::from_secs(5)).into();
        let driver: ParserError = BrowserError::driver("socket closed").into();

        assert!(not_found.is_page_structure_error());
        assert!(timeout.is_page_structure_error());
        assert!(!driver.is_page_structure_error());
        assert!(!ParserError::configuration("bad").is_page_structure_error());
    }

    #[test]
    fn messages_name_the_failing_piece() {
        let err = ParserError::missing_attribute("href", "document row 'SAQ A'");
        assert_eq!(
            err.to_string(),
            "Required attribute 'href' missing on document row 'SAQ A'"
        );
        let err: ParserError = BrowserError::not_found("id=tabcontent").into();
        assert_eq!(err.to_string(), "Element not found: id=tabcontent");
    }
}
