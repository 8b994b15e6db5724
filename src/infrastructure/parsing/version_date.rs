//! Splitting the combined "version - date" label of a document row

use chrono::{DateTime, Utc};

use super::fuzzy_date::parse_fuzzy_or_unknown;
use crate::domain::SppDocument;

pub const VERSION_DATE_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionAndDate {
    /// Empty when the label carries no version
    pub version: String,
    /// `SppDocument::UNKNOWN_PUB_DATE` when no date could be recognized
    pub pub_date: DateTime<Utc>,
}

/// Split a label such as `"v3.2 - March 2021"`.
///
/// - two parts: version, then a fuzzy date
/// - one part starting with `v`: version only, date unknown
/// - anything else: no version, the first part is read as a fuzzy date
pub fn split_version_and_date(label: &str) -> VersionAndDate {
    let parts: Vec<&str> = label.split(VERSION_DATE_SEPARATOR).collect();
    match parts.as_slice() {
        [version, date] => VersionAndDate {
            version: (*version).to_string(),
            pub_date: parse_fuzzy_or_unknown(date),
        },
        [only] if only.starts_with('v') => VersionAndDate {
            version: (*only).to_string(),
            pub_date: SppDocument::UNKNOWN_PUB_DATE,
        },
        _ => VersionAndDate {
            version: String::new(),
            pub_date: parse_fuzzy_or_unknown(parts.first().copied().unwrap_or_default()),
        },
    }
}
