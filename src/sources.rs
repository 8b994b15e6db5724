//! Source plugins
//!
//! Each source implements [`SourceParser`]; the host builds one parser per
//! pass with a fresh browser session and calls `content()`.

pub mod download;
pub mod pci;
pub mod source_parser;

pub use download::{
    generic_stubborn_download, pci_stubborn_download, stubborn_download, AgreementDetails,
    InteractionStep, StepOutcome,
};
pub use pci::PciParser;
pub use source_parser::{GenericSourceParser, SourceParser};
