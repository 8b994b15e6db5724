//! Configuration infrastructure
//!
//! Contains configuration loading and management for the scraper plugin.
//!
//! Configuration is organized into three sections:
//! 1. `pci` - the document library scrape pass
//! 2. `download` - the stubborn download helper
//! 3. `logging` - log outputs and levels

#![allow(clippy::derivable_impls)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::DocumentType;

/// Complete plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub pci: PciConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}

/// Settings for one scrape pass over the PCI document library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PciConfig {
    /// Document library page
    pub host: String,

    /// Restrict results to one category; `All Document` keeps everything
    pub document_type: DocumentType,

    /// Page load timeout in seconds
    pub page_load_timeout_secs: u64,

    /// Pause after navigation before touching the page
    pub settle_after_navigation_ms: u64,

    /// Pause after the walk before closing the browser
    pub settle_before_close_ms: u64,

    /// Wait for the cookie banner button to become clickable
    pub cookie_wait_secs: u64,

    /// Wait for the results container to appear
    pub results_wait_secs: u64,

    /// Wait for the document type filter to become clickable
    pub filter_wait_secs: u64,

    /// Stop the walk after this many rows; `None` walks the whole page
    pub max_rows: Option<usize>,
}

/// Settings for the stubborn download helper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Page load timeout in seconds
    pub page_load_timeout_secs: u64,

    /// Pause after navigation before the optional interaction steps
    pub settle_after_navigation_ms: u64,

    /// Wait used inside each optional interaction step
    pub step_wait_secs: u64,

    /// Interval between checks for the downloaded file
    pub poll_interval_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "chromiumoxide": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            pci: PciConfig::default(),
            download: DownloadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PciConfig {
    fn default() -> Self {
        Self {
            host: pci::HOST.to_string(),
            document_type: DocumentType::AllDocuments,
            page_load_timeout_secs: defaults::PCI_PAGE_LOAD_TIMEOUT_SECS,
            settle_after_navigation_ms: defaults::PCI_SETTLE_AFTER_NAVIGATION_MS,
            settle_before_close_ms: defaults::PCI_SETTLE_BEFORE_CLOSE_MS,
            cookie_wait_secs: defaults::COOKIE_WAIT_SECS,
            results_wait_secs: defaults::RESULTS_WAIT_SECS,
            filter_wait_secs: defaults::FILTER_WAIT_SECS,
            max_rows: None,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_secs: defaults::DOWNLOAD_PAGE_LOAD_TIMEOUT_SECS,
            settle_after_navigation_ms: defaults::DOWNLOAD_SETTLE_AFTER_NAVIGATION_MS,
            step_wait_secs: defaults::DOWNLOAD_STEP_WAIT_SECS,
            poll_interval_ms: defaults::DOWNLOAD_POLL_INTERVAL_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("chromiumoxide".to_string(), "warn".to_string());
                filters.insert("tungstenite".to_string(), "warn".to_string());
                filters.insert("async_tungstenite".to_string(), "warn".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl PciConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn settle_after_navigation(&self) -> Duration {
        Duration::from_millis(self.settle_after_navigation_ms)
    }

    pub fn settle_before_close(&self) -> Duration {
        Duration::from_millis(self.settle_before_close_ms)
    }

    pub fn cookie_wait(&self) -> Duration {
        Duration::from_secs(self.cookie_wait_secs)
    }

    pub fn results_wait(&self) -> Duration {
        Duration::from_secs(self.results_wait_secs)
    }

    pub fn filter_wait(&self) -> Duration {
        Duration::from_secs(self.filter_wait_secs)
    }

    /// Same settings without any pauses, for driving an in-memory page
    pub fn without_pauses(mut self) -> Self {
        self.settle_after_navigation_ms = 0;
        self.settle_before_close_ms = 0;
        self
    }
}

impl DownloadConfig {
    /// Settings for a source with no special interaction before the download
    pub fn generic() -> Self {
        Self {
            page_load_timeout_secs: defaults::GENERIC_DOWNLOAD_PAGE_LOAD_TIMEOUT_SECS,
            settle_after_navigation_ms: defaults::GENERIC_DOWNLOAD_SETTLE_AFTER_NAVIGATION_MS,
            ..Self::default()
        }
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn settle_after_navigation(&self) -> Duration {
        Duration::from_millis(self.settle_after_navigation_ms)
    }

    pub fn step_wait(&self) -> Duration {
        Duration::from_secs(self.step_wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("pci-document-scraper");

        Ok(config_dir)
    }

    /// Configuration manager for the default per-user location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join("config.json")))
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<ScraperConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = ScraperConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<ScraperConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("Configuration file is invalid: {}", parse_error);
                warn!("Resetting to default configuration");

                // Keep the broken file around for inspection
                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = ScraperConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &ScraperConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// PCI Security Standards Council document library
pub mod pci {
    /// Source name reported to the host
    pub const SOURCE_NAME: &str = "pci";

    /// Document library page
    pub const HOST: &str = "https://www.pcisecuritystandards.org/document_library/";

    /// Cookie consent accept button
    pub const COOKIE_ACCEPT_ID: &str = "ccc-notify-accept";

    /// Container that appears once the library has loaded
    pub const RESULTS_ID: &str = "results";

    /// Search-by-document-type control
    pub const SEARCH_BY_DOC_TYPE_ID: &str = "search_by_doc_Type";

    /// Document category `<select>`
    pub const DOCUMENT_CATEGORY_ID: &str = "document_category";

    /// Option value listing every document
    pub const ALL_DOCUMENTS_VALUE: &str = "all_documents";

    /// Container holding the flat list of rows
    pub const TAB_CONTENT_ID: &str = "tabcontent";

    /// Document title inside a document row
    pub const DOCUMENT_NAME_CLASS: &str = "document_name";

    /// Substring of the id of the version holder inside a document row
    pub const VERSION_SELECT_ID_FRAGMENT: &str = "version_select";

    /// Agreement form shown before some downloads
    pub mod agreement {
        pub const FORM_ID: &str = "agreement_form";
        pub const CONTACT_NAME_ID: &str = "contact_name";
        pub const CONTACT_TITLE_ID: &str = "contact_title";
        pub const COMPANY_ID: &str = "company";
        pub const COUNTRY_ID: &str = "country";
        pub const SUBMIT_SELECTOR: &str = "#doc_agreement > div:nth-of-type(4) > input:nth-of-type(1)";

        // Placeholder answers; the site only checks that the fields are filled
        pub const CONTACT_NAME: &str = "Company";
        pub const CONTACT_TITLE: &str = "People";
        pub const COMPANY: &str = "cbr";
        pub const COUNTRY: &str = "Russian";
    }
}

/// Default configuration values
pub mod defaults {
    /// Default page load timeout for the scrape pass
    pub const PCI_PAGE_LOAD_TIMEOUT_SECS: u64 = 40;

    /// Default pause after navigating to the library
    pub const PCI_SETTLE_AFTER_NAVIGATION_MS: u64 = 2000;

    /// Default pause before closing the browser
    pub const PCI_SETTLE_BEFORE_CLOSE_MS: u64 = 5000;

    /// Default wait for the cookie banner
    pub const COOKIE_WAIT_SECS: u64 = 5;

    /// Default wait for the results container
    pub const RESULTS_WAIT_SECS: u64 = 5;

    /// Default wait for the document type filter
    pub const FILTER_WAIT_SECS: u64 = 2;

    /// Default page load timeout for source-specific downloads
    pub const DOWNLOAD_PAGE_LOAD_TIMEOUT_SECS: u64 = 60;

    /// Default pause after navigating to a download link
    pub const DOWNLOAD_SETTLE_AFTER_NAVIGATION_MS: u64 = 3000;

    /// Default page load timeout for generic downloads
    pub const GENERIC_DOWNLOAD_PAGE_LOAD_TIMEOUT_SECS: u64 = 40;

    /// Default pause after navigating for generic downloads
    pub const GENERIC_DOWNLOAD_SETTLE_AFTER_NAVIGATION_MS: u64 = 1000;

    /// Default wait inside optional download steps
    pub const DOWNLOAD_STEP_WAIT_SECS: u64 = 5;

    /// Default download poll interval
    pub const DOWNLOAD_POLL_INTERVAL_MS: u64 = 1000;

    // Log configuration defaults
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default log file name
    pub const LOG_FILE_NAME: &str = "pci-document-scraper.log";
}
