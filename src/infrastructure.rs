//! Infrastructure layer: browser automation, page parsing, configuration
//! and logging

pub mod browser;
pub mod config;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use browser::{BrowserError, BrowserResult, Locator};
pub use config::{ConfigManager, DownloadConfig, LoggingConfig, PciConfig, ScraperConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing_error::{ParserError, ParserResult};
