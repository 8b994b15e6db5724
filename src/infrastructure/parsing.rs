//! Pure extraction logic for document library pages
//!
//! Nothing in here touches the browser: the walk consumes already-read
//! [`Row`] values, and the version/date and link helpers work on strings.

pub mod fuzzy_date;
pub mod link;
pub mod rows;
pub mod version_date;

// Re-export public types
pub use fuzzy_date::{normalize_to_seconds, parse_fuzzy, parse_fuzzy_or_unknown};
pub use link::{filename_from_link, resolve_link};
pub use rows::{build_document, walk_rows, DocumentRow, Row, RowKind, RowWalker, WalkState};
pub use version_date::{split_version_and_date, VersionAndDate, VERSION_DATE_SEPARATOR};
