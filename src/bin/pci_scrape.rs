//! Run one scrape pass over the PCI document library
//!
//! Launches Chromium, runs the pci source parser and prints every document
//! found as a JSON line on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use pci_document_scraper::infrastructure::{init_logging_with_config, ConfigManager};
use pci_document_scraper::{
    ChromiumSession, DocumentType, LaunchOptions, PciParser, SourceParser, SppDocument,
};

#[derive(Parser, Debug)]
#[command(
    name = "pci_scrape",
    about = "Scrape the PCI Security Standards Council document library"
)]
struct Cli {
    /// Only keep documents of this category, e.g. "SAQ" or "PCI DSS"
    #[arg(long)]
    document_type: Option<DocumentType>,

    /// Stop after this many page rows
    #[arg(long)]
    max_rows: Option<usize>,

    /// Configuration file; defaults to the per-user config directory
    #[arg(long, env = "PCI_SCRAPER_CONFIG")]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, default_value_t = false)]
    headful: bool,
}

#[derive(Serialize)]
struct Record<'a> {
    hash: String,
    #[serde(flatten)]
    document: &'a SppDocument,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;
    init_logging_with_config(config.logging.clone())?;

    if let Some(document_type) = cli.document_type {
        config.pci.document_type = document_type;
    }
    if cli.max_rows.is_some() {
        config.pci.max_rows = cli.max_rows;
    }

    let session = ChromiumSession::launch(LaunchOptions {
        headful: cli.headful,
        ..LaunchOptions::default()
    })
    .await
    .context("Failed to launch Chromium")?;

    let mut parser = PciParser::with_config(session, config.pci);
    let documents = parser.content().await.context("Scrape pass failed")?;
    info!("Scrape pass finished with {} documents", documents.len());

    for document in &documents {
        let record = Record {
            hash: document.hash_hex(),
            document,
        };
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}
