//! Category / sub-category walk over the flat row list of the library page
//!
//! The page lists headings and documents as sibling rows. A heading applies
//! to every document after it until another heading of the same level
//! replaces it; a new category does not clear the sub-category.

use std::collections::HashMap;

use super::link::filename_from_link;
use super::version_date::split_version_and_date;
use crate::domain::{other_data_keys, DocumentType, SppDocument};

pub const CATEGORY_CLASS_NAME: &str = "doc_library_category parent_category";
pub const SUB_CATEGORY_CLASS_NAME: &str = "doc_library_category category";
pub const DOCUMENT_ROW_CLASS_NAME: &str = "document_row_container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Category,
    SubCategory,
    Document,
    Other,
}

impl RowKind {
    /// Classify by the row's exact `class` attribute
    pub fn classify(class_attr: &str) -> Self {
        match class_attr {
            CATEGORY_CLASS_NAME => Self::Category,
            SUB_CATEGORY_CLASS_NAME => Self::SubCategory,
            DOCUMENT_ROW_CLASS_NAME => Self::Document,
            _ => Self::Other,
        }
    }
}

/// What was read off a document row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub name: String,
    /// Combined label, e.g. `"v4.0 - March 2022"`; empty when absent
    pub version_and_date: String,
    /// Absolute link to the document
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Category(String),
    SubCategory(String),
    Document(DocumentRow),
    Other,
}

/// Headings in effect at the current point of the walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkState {
    pub category: String,
    pub sub_category: String,
}

/// Stateful row consumer; feed rows in page order
#[derive(Debug, Clone, Default)]
pub struct RowWalker {
    state: WalkState,
    filter: DocumentType,
}

impl RowWalker {
    pub fn new(filter: DocumentType) -> Self {
        Self {
            state: WalkState::default(),
            filter,
        }
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Consume one row, returning the record for document rows that pass
    /// the document-type filter
    pub fn step(&mut self, row: Row) -> Option<SppDocument> {
        match row {
            Row::Category(text) => {
                self.state.category = text;
                None
            }
            Row::SubCategory(text) => {
                self.state.sub_category = text;
                None
            }
            Row::Document(document) => {
                if self.filter.admits(&self.state.category) {
                    Some(build_document(document, &self.state))
                } else {
                    None
                }
            }
            Row::Other => None,
        }
    }
}

/// Walk a complete row list. `max_rows` caps how many rows are looked at,
/// counting every row whatever its kind.
pub fn walk_rows<I>(rows: I, filter: DocumentType, max_rows: Option<usize>) -> Vec<SppDocument>
where
    I: IntoIterator<Item = Row>,
{
    let mut walker = RowWalker::new(filter);
    rows.into_iter()
        .take(max_rows.unwrap_or(usize::MAX))
        .filter_map(|row| walker.step(row))
        .collect()
}

/// Stamp a document row with the headings in effect
pub fn build_document(row: DocumentRow, state: &WalkState) -> SppDocument {
    let parsed = split_version_and_date(&row.version_and_date);
    let filename = filename_from_link(&row.link).to_string();

    let mut other_data = HashMap::with_capacity(4);
    other_data.insert(other_data_keys::VERSION.to_string(), parsed.version.into());
    other_data.insert(
        other_data_keys::SUB_CATEGORY.to_string(),
        state.sub_category.clone().into(),
    );
    other_data.insert(
        other_data_keys::CATEGORY.to_string(),
        state.category.clone().into(),
    );
    other_data.insert(other_data_keys::FILENAME.to_string(), filename.into());

    SppDocument::scraped(row.name, row.link, other_data, parsed.pub_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(name: &str) -> Row {
        Row::Document(DocumentRow {
            name: name.to_string(),
            version_and_date: "v1.0 - May 2020".to_string(),
            link: format!("https://example.com/docs/{name}.pdf"),
        })
    }

    fn headings(d: &SppDocument) -> (&str, &str) {
        (
            d.other_str(other_data_keys::CATEGORY).unwrap(),
            d.other_str(other_data_keys::SUB_CATEGORY).unwrap(),
        )
    }

    #[test]
    fn classification_is_exact() {
        assert_eq!(RowKind::classify(CATEGORY_CLASS_NAME), RowKind::Category);
        assert_eq!(RowKind::classify(SUB_CATEGORY_CLASS_NAME), RowKind::SubCategory);
        assert_eq!(RowKind::classify(DOCUMENT_ROW_CLASS_NAME), RowKind::Document);
        assert_eq!(RowKind::classify("document_name"), RowKind::Other);
        assert_eq!(RowKind::classify("doc_library_category"), RowKind::Other);
        assert_eq!(RowKind::classify(""), RowKind::Other);
    }

    #[test]
    fn new_category_keeps_previous_sub_category() {
        let rows = vec![
            Row::Category("A".into()),
            Row::SubCategory("a1".into()),
            doc("X"),
            doc("Y"),
            Row::Category("B".into()),
            doc("Z"),
        ];

        let docs = walk_rows(rows, DocumentType::AllDocuments, None);

        assert_eq!(docs.len(), 3);
        assert_eq!(headings(&docs[0]), ("A", "a1"));
        assert_eq!(headings(&docs[1]), ("A", "a1"));
        assert_eq!(headings(&docs[2]), ("B", "a1"));
        assert_eq!(docs[2].title, "Z");
    }

    #[test]
    fn documents_before_any_heading_get_empty_headings() {
        let docs = walk_rows(vec![Row::Other, doc("X")], DocumentType::AllDocuments, None);
        assert_eq!(headings(&docs[0]), ("", ""));
    }

    #[test]
    fn row_cap_counts_every_row() {
        let rows = vec![
            Row::Category("A".into()),
            Row::Other,
            doc("X"),
            doc("Y"),
        ];
        let docs = walk_rows(rows, DocumentType::AllDocuments, Some(3));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "X");
    }

    #[test]
    fn document_type_filter_keeps_matching_category() {
        let rows = vec![
            Row::Category("PCI DSS".into()),
            doc("dss"),
            Row::Category("SAQ".into()),
            doc("saq_a"),
        ];
        let docs = walk_rows(rows, DocumentType::Saq, None);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "saq_a");
    }

    #[test]
    fn built_record_carries_version_filename_and_date() {
        let state = WalkState {
            category: "PCI DSS".into(),
            sub_category: "Standards".into(),
        };
        let record = build_document(
            DocumentRow {
                name: "PCI DSS v4.0".into(),
                version_and_date: "v4.0 - March 2022".into(),
                link: "https://example.com/docs/PCI-DSS-v4_0.pdf".into(),
            },
            &state,
        );

        assert_eq!(record.title, "PCI DSS v4.0");
        assert_eq!(record.other_str(other_data_keys::VERSION), Some("v4.0"));
        assert_eq!(record.other_str(other_data_keys::FILENAME), Some("PCI-DSS-v4_0.pdf"));
        assert_eq!(record.pub_date, Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap());
        assert!(record.doc_id.is_none());
        assert!(record.load_date.is_none());
        assert!(record.local_link.is_none());
    }
}
