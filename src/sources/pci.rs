//! PCI Security Standards Council document library
//!
//! One pass loads the library page, switches the type filter to "all
//! documents" and walks the flat row list under `#tabcontent`, attributing
//! every document row to the category and sub-category headings above it.

use async_trait::async_trait;
use std::path::Path;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::domain::{DocumentType, SppDocument};
use crate::infrastructure::browser::{
    wait_for_element, wait_until_clickable, BrowserElement, BrowserSession, Locator,
};
use crate::infrastructure::config::{pci, PciConfig};
use crate::infrastructure::parsing::{resolve_link, DocumentRow, Row, RowKind, RowWalker};
use crate::infrastructure::parsing_error::{ParserError, ParserResult};
use crate::sources::download::pci_stubborn_download;
use crate::sources::source_parser::SourceParser;

/// Scraper for the PCI document library
pub struct PciParser<S: BrowserSession> {
    session: Option<S>,
    config: PciConfig,
    documents: Vec<SppDocument>,
}

impl<S: BrowserSession> PciParser<S> {
    /// Parser with default timings, keeping documents of `document_type`
    pub fn new(session: S, document_type: DocumentType) -> Self {
        Self::with_config(
            session,
            PciConfig {
                document_type,
                ..PciConfig::default()
            },
        )
    }

    pub fn with_config(session: S, config: PciConfig) -> Self {
        debug!("Parser class init completed");
        info!("Set source: {}", pci::SOURCE_NAME);
        Self {
            session: Some(session),
            config,
            documents: Vec::new(),
        }
    }

    pub fn config(&self) -> &PciConfig {
        &self.config
    }

    /// Download a library file, getting past the cookie banner and the
    /// agreement form. See [`crate::sources::download::stubborn_download`].
    pub async fn stubborn_download(session: S, dir: &Path, url: &str) -> ParserResult<String> {
        pci_stubborn_download(session, dir, url).await
    }

    async fn scrape(&mut self, session: &mut S) -> ParserResult<()> {
        let config = &self.config;
        debug!("Parser enter to {}", config.host);

        session.set_page_load_timeout(config.page_load_timeout());
        session.navigate(&config.host).await?;
        sleep(config.settle_after_navigation()).await;

        let accept = session.find_element(&Locator::id(pci::COOKIE_ACCEPT_ID)).await?;
        wait_until_clickable(&accept, pci::COOKIE_ACCEPT_ID, config.cookie_wait()).await?;
        accept.click().await?;
        debug!("Parser enter notify accept");

        wait_for_element(&*session, &Locator::id(pci::RESULTS_ID), config.results_wait()).await?;
        let search_by_type = session
            .find_element(&Locator::id(pci::SEARCH_BY_DOC_TYPE_ID))
            .await?;
        wait_until_clickable(&search_by_type, pci::SEARCH_BY_DOC_TYPE_ID, config.filter_wait())
            .await?;
        session
            .find_element(&Locator::id(pci::DOCUMENT_CATEGORY_ID))
            .await?
            .select_by_value(pci::ALL_DOCUMENTS_VALUE)
            .await?;

        let rows = session
            .find_element(&Locator::id(pci::TAB_CONTENT_ID))
            .await?
            .find_elements(&Locator::tag("div"))
            .await?;
        debug!("Found {} rows in the library", rows.len());

        let limit = config.max_rows.unwrap_or(usize::MAX);
        if rows.len() > limit {
            info!("Row limit {} reached, skipping {} rows", limit, rows.len() - limit);
        }

        let mut walker = RowWalker::new(config.document_type);
        for row in rows.iter().take(limit) {
            let row = read_row(row, &config.host).await?;
            if let Some(document) = walker.step(row) {
                info!("{}", document);
                self.documents.push(document);
            }
        }

        sleep(config.settle_before_close()).await;
        Ok(())
    }
}

#[async_trait]
impl<S: BrowserSession> SourceParser for PciParser<S> {
    fn source_name(&self) -> &str {
        pci::SOURCE_NAME
    }

    fn documents_mut(&mut self) -> &mut Vec<SppDocument> {
        &mut self.documents
    }

    async fn parse(&mut self) -> ParserResult<()> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| ParserError::configuration("browser session already released"))?;

        let outcome = self.scrape(&mut session).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        outcome
    }
}

/// Classify a row and read what its kind needs
async fn read_row<E: BrowserElement>(row: &E, host: &str) -> ParserResult<Row> {
    let class = row.attribute("class").await?.unwrap_or_default();
    let row = match RowKind::classify(&class) {
        RowKind::Category => Row::Category(row.text().await?),
        RowKind::SubCategory => Row::SubCategory(row.text().await?),
        RowKind::Document => Row::Document(read_document_row(row, host).await?),
        RowKind::Other => Row::Other,
    };
    Ok(row)
}

async fn read_document_row<E: BrowserElement>(row: &E, host: &str) -> ParserResult<DocumentRow> {
    let name = row
        .find_element(&Locator::class_name(pci::DOCUMENT_NAME_CLASS))
        .await?
        .text()
        .await?;

    let version_and_date = read_version_and_date(row).await?;

    let href = row
        .find_element(&Locator::tag("a"))
        .await?
        .attribute("href")
        .await?
        .ok_or_else(|| ParserError::missing_attribute("href", &name))?;
    let link = resolve_link(host, &href)?;

    Ok(DocumentRow {
        name,
        version_and_date,
        link,
    })
}

/// Text of the version holder: the selected `<option>` when it is a
/// dropdown, its own text otherwise, empty when the row has none
async fn read_version_and_date<E: BrowserElement>(row: &E) -> ParserResult<String> {
    let mut holders = Vec::new();
    for div in row.find_elements(&Locator::tag("div")).await? {
        let id = div.attribute("id").await?.unwrap_or_default();
        if id.contains(pci::VERSION_SELECT_ID_FRAGMENT) {
            holders.push(div);
        }
    }

    let [holder] = holders.as_slice() else {
        return Ok(String::new());
    };

    let selected = match holder.find_element(&Locator::tag("select")).await {
        Ok(select) => select.selected_option_text().await,
        Err(e) => Err(e),
    };
    match selected {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!("No version dropdown ({}), reading plain text", e);
            Ok(holder.text().await?)
        }
    }
}
