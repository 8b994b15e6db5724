//! The contract every source plugin fulfils for the host platform

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::SppDocument;
use crate::infrastructure::browser::BrowserSession;
use crate::infrastructure::parsing_error::ParserResult;

/// A source plugin.
///
/// The pending document list starts empty when the parser is built, is
/// filled by [`SourceParser::parse`], and is handed over by
/// [`SourceParser::content`]. A parser is meant to be used for one pass.
#[async_trait]
pub trait SourceParser: Send {
    /// Source name reported to the host, e.g. `pci`
    fn source_name(&self) -> &str;

    /// Pending documents of the current pass
    fn documents_mut(&mut self) -> &mut Vec<SppDocument>;

    /// Scrape the source, appending to the pending list
    async fn parse(&mut self) -> ParserResult<()>;

    /// Entry point called by the host: run the pass and hand the list over
    async fn content(&mut self) -> ParserResult<Vec<SppDocument>> {
        debug!("Parse process start ({})", self.source_name());
        self.parse().await?;
        debug!("Parse process finished ({})", self.source_name());
        Ok(std::mem::take(self.documents_mut()))
    }
}

/// Parser for a source without a dedicated implementation
///
/// Produces no documents; a pass only releases the browser session.
pub struct GenericSourceParser<S: BrowserSession> {
    session: Option<S>,
    source_name: String,
    documents: Vec<SppDocument>,
}

impl<S: BrowserSession> GenericSourceParser<S> {
    pub fn new(session: S, source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        info!("Set source: {}", source_name);
        Self {
            session: Some(session),
            source_name,
            documents: Vec::new(),
        }
    }
}

#[async_trait]
impl<S: BrowserSession> SourceParser for GenericSourceParser<S> {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn documents_mut(&mut self) -> &mut Vec<SppDocument> {
        &mut self.documents
    }

    async fn parse(&mut self) -> ParserResult<()> {
        if let Some(mut session) = self.session.take() {
            session.close().await?;
        }
        Ok(())
    }
}
