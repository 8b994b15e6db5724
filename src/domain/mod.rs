//! Domain module - documents and the categories they are filed under
//!
//! Plain value types shared by every source parser and by the host.

pub mod document;
pub mod document_type;

// Re-export commonly used items
pub use document::{other_data_keys, SppDocument};
pub use document_type::{DocumentType, UnknownDocumentType};
