//! Document link helpers

use url::Url;

use crate::infrastructure::parsing_error::{ParserError, ParserResult};

/// Final path segment of a link: the text after the last `/`
pub fn filename_from_link(link: &str) -> &str {
    link.rsplit_once('/').map_or(link, |(_, name)| name)
}

/// Make an `href` absolute against the page it was found on
pub fn resolve_link(base: &str, href: &str) -> ParserResult<String> {
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.into());
    }
    let base = Url::parse(base).map_err(|e| ParserError::invalid_link(base, e))?;
    base.join(href)
        .map(String::from)
        .map_err(|e| ParserError::invalid_link(href, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_last_path_segment() {
        assert_eq!(
            filename_from_link("https://example.com/docs/file_v2.pdf"),
            "file_v2.pdf"
        );
        assert_eq!(filename_from_link("https://example.com/docs/"), "");
        assert_eq!(filename_from_link("file.pdf"), "file.pdf");
    }

    #[test]
    fn absolute_links_pass_through() {
        let link = resolve_link(
            "https://www.pcisecuritystandards.org/document_library/",
            "https://docs-prv.pcisecuritystandards.org/SAQ/SAQ_A.pdf",
        )
        .unwrap();
        assert_eq!(link, "https://docs-prv.pcisecuritystandards.org/SAQ/SAQ_A.pdf");
    }

    #[test]
    fn relative_links_are_joined_to_the_page() {
        let link = resolve_link(
            "https://www.pcisecuritystandards.org/document_library/",
            "/documents/PCI_DSS_v4.pdf",
        )
        .unwrap();
        assert_eq!(link, "https://www.pcisecuritystandards.org/documents/PCI_DSS_v4.pdf");
    }

    #[test]
    fn unusable_base_is_reported() {
        let err = resolve_link("not a url", "doc.pdf").unwrap_err();
        assert!(matches!(err, ParserError::InvalidLink { .. }));
    }
}
