//! PCI document library scraper
//!
//! A source plugin for a document-collection platform: drives a browser over
//! the PCI Security Standards Council document library and returns one
//! [`SppDocument`] per listed document, stamped with its category,
//! sub-category, version and publication date.

// Module declarations
pub mod domain;
pub mod infrastructure;
pub mod sources;
pub mod test_utils;

// Re-export the host-facing surface
pub use domain::{DocumentType, SppDocument};
pub use infrastructure::browser::{BrowserElement, BrowserSession, ChromiumSession, LaunchOptions};
pub use infrastructure::parsing_error::{ParserError, ParserResult};
pub use sources::{PciParser, SourceParser};
