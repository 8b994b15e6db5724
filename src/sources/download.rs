//! Downloads from "stubborn" sources
//!
//! Some sources only start a file transfer after scripted interaction
//! (cookie banners, agreement forms). The helper drives those steps, then
//! waits for the browser to drop the file into the download directory.
//! Optional steps never abort the download; their outcome is only logged.

use std::path::Path;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::infrastructure::config::pci::{self, agreement};
use crate::infrastructure::config::DownloadConfig;
use crate::infrastructure::browser::{
    wait_for_element, wait_until_clickable, BrowserElement, BrowserError, BrowserResult,
    BrowserSession, Locator,
};
use crate::infrastructure::parsing::filename_from_link;
use crate::infrastructure::parsing_error::ParserResult;

/// Scripted interaction performed before the download starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionStep {
    /// Accept the cookie consent banner
    CookieBanner,
    /// Fill and submit the document agreement form
    AgreementForm(AgreementDetails),
}

/// Answers typed into the agreement form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementDetails {
    pub contact_name: String,
    pub contact_title: String,
    pub company: String,
    pub country: String,
}

impl Default for AgreementDetails {
    fn default() -> Self {
        Self {
            contact_name: agreement::CONTACT_NAME.to_string(),
            contact_title: agreement::CONTACT_TITLE.to_string(),
            company: agreement::COMPANY.to_string(),
            country: agreement::COUNTRY.to_string(),
        }
    }
}

impl InteractionStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CookieBanner => "cookie banner",
            Self::AgreementForm(_) => "agreement form",
        }
    }
}

/// Result of one optional step
#[derive(Debug)]
pub enum StepOutcome {
    Completed,
    /// The step's anchor element is not on the page
    Skipped,
    Failed(BrowserError),
}

impl StepOutcome {
    fn from_result(result: BrowserResult<bool>) -> Self {
        match result {
            Ok(true) => Self::Completed,
            Ok(false) => Self::Skipped,
            Err(e) => Self::Failed(e),
        }
    }
}

/// Drive `steps`, then block until the file named after the last segment of
/// `url` exists in `dir`.
///
/// The session is owned by the call and closed on every exit path; dropping
/// the future (e.g. under `tokio::time::timeout`) drops the session with it.
/// The wait for the file has no timeout of its own.
///
/// Returns the file name, or an empty string when the path exists but is not
/// a regular file.
pub async fn stubborn_download<S: BrowserSession>(
    mut session: S,
    dir: &Path,
    url: &str,
    config: &DownloadConfig,
    steps: &[InteractionStep],
) -> ParserResult<String> {
    let outcome = drive_download(&mut session, dir, url, config, steps).await;
    if let Err(e) = session.close().await {
        warn!("Failed to close browser after download of {}: {}", url, e);
    }
    outcome
}

async fn drive_download<S: BrowserSession>(
    session: &mut S,
    dir: &Path,
    url: &str,
    config: &DownloadConfig,
    steps: &[InteractionStep],
) -> ParserResult<String> {
    session.set_page_load_timeout(config.page_load_timeout());
    session.navigate(url).await?;
    sleep(config.settle_after_navigation()).await;

    for step in steps {
        match run_step(session, step, config).await {
            StepOutcome::Completed => debug!("Download step '{}' completed", step.name()),
            StepOutcome::Skipped => debug!("Download step '{}' not needed", step.name()),
            StepOutcome::Failed(e) => warn!("Download step '{}' failed: {}", step.name(), e),
        }
    }

    wait_for_file(dir, filename_from_link(url), config).await
}

/// Download from the PCI library: cookie banner and agreement form first
pub async fn pci_stubborn_download<S: BrowserSession>(
    session: S,
    dir: &Path,
    url: &str,
) -> ParserResult<String> {
    let steps = [
        InteractionStep::CookieBanner,
        InteractionStep::AgreementForm(AgreementDetails::default()),
    ];
    stubborn_download(session, dir, url, &DownloadConfig::default(), &steps).await
}

/// Download from a source that needs no interaction before the transfer
pub async fn generic_stubborn_download<S: BrowserSession>(
    session: S,
    dir: &Path,
    url: &str,
) -> ParserResult<String> {
    stubborn_download(session, dir, url, &DownloadConfig::generic(), &[]).await
}

/// Run one optional step; never fails
pub async fn run_step<S: BrowserSession>(
    session: &S,
    step: &InteractionStep,
    config: &DownloadConfig,
) -> StepOutcome {
    let result = match step {
        InteractionStep::CookieBanner => accept_cookies(session, config).await,
        InteractionStep::AgreementForm(details) => {
            submit_agreement(session, details, config).await
        }
    };
    StepOutcome::from_result(result)
}

async fn accept_cookies<S: BrowserSession>(
    session: &S,
    config: &DownloadConfig,
) -> BrowserResult<bool> {
    let accept = match session.find_element(&Locator::id(pci::COOKIE_ACCEPT_ID)).await {
        Ok(element) => element,
        Err(e) if e.is_not_found() => return Ok(false),
        Err(e) => return Err(e),
    };
    wait_until_clickable(&accept, pci::COOKIE_ACCEPT_ID, config.step_wait()).await?;
    accept.click().await?;
    Ok(true)
}

async fn submit_agreement<S: BrowserSession>(
    session: &S,
    details: &AgreementDetails,
    config: &DownloadConfig,
) -> BrowserResult<bool> {
    match session.find_element(&Locator::id(agreement::FORM_ID)).await {
        Ok(_) => {}
        Err(e) if e.is_not_found() => return Ok(false),
        Err(e) => return Err(e),
    }

    let fields = [
        (agreement::CONTACT_NAME_ID, &details.contact_name),
        (agreement::CONTACT_TITLE_ID, &details.contact_title),
        (agreement::COMPANY_ID, &details.company),
        (agreement::COUNTRY_ID, &details.country),
    ];
    for (id, value) in fields {
        session.find_element(&Locator::id(id)).await?.send_keys(value).await?;
    }

    let submit_locator = Locator::css(agreement::SUBMIT_SELECTOR);
    let submit = wait_for_element(session, &submit_locator, config.step_wait()).await?;
    wait_until_clickable(&submit, "agreement submit", config.step_wait()).await?;
    submit.click().await?;
    Ok(true)
}

/// Poll `dir` until `filename` shows up
async fn wait_for_file(dir: &Path, filename: &str, config: &DownloadConfig) -> ParserResult<String> {
    let target = dir.join(filename);
    debug!("Waiting for download {:?}", target);

    loop {
        match fs::try_exists(&target).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => debug!("Cannot check {:?} yet, still waiting: {}", target, e),
        }
        sleep(config.poll_interval()).await;
    }

    match fs::metadata(&target).await {
        Ok(metadata) if metadata.is_file() => {
            info!("Downloaded {}", filename);
            Ok(filename.to_string())
        }
        Ok(_) => {
            warn!("{:?} exists but is not a regular file", target);
            Ok(String::new())
        }
        Err(e) => {
            warn!("{:?} disappeared after it was found: {}", target, e);
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSession;

    fn fast_config() -> DownloadConfig {
        DownloadConfig {
            settle_after_navigation_ms: 0,
            step_wait_secs: 0,
            poll_interval_ms: 20,
            ..DownloadConfig::default()
        }
    }

    fn agreement_page() -> FakeSession {
        FakeSession::new(&format!(
            r#"<button id="{cookie}">Accept</button>
            <form id="doc_agreement">
                <div id="{form}">
                    <input id="{name}">
                    <input id="{title}">
                </div>
                <div><input id="{company}"></div>
                <div><input id="{country}"></div>
                <div>
                    <input id="agree" type="submit">
                    <input id="cancel" type="button">
                </div>
            </form>"#,
            cookie = pci::COOKIE_ACCEPT_ID,
            form = pci::agreement::FORM_ID,
            name = pci::agreement::CONTACT_NAME_ID,
            title = pci::agreement::CONTACT_TITLE_ID,
            company = pci::agreement::COMPANY_ID,
            country = pci::agreement::COUNTRY_ID,
        ))
    }

    #[tokio::test]
    async fn cookie_step_is_skipped_when_banner_absent() {
        let session = FakeSession::new("<p>Downloading</p>");
        let outcome = run_step(&session, &InteractionStep::CookieBanner, &fast_config()).await;
        assert!(matches!(outcome, StepOutcome::Skipped));
    }

    #[tokio::test]
    async fn cookie_step_fails_without_aborting_when_not_clickable() {
        let session = FakeSession::new(&format!(
            r#"<button id="{}" disabled>Accept</button>"#,
            pci::COOKIE_ACCEPT_ID
        ));
        let outcome = run_step(&session, &InteractionStep::CookieBanner, &fast_config()).await;
        assert!(matches!(outcome, StepOutcome::Failed(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn agreement_form_is_filled_and_submitted() {
        let session = agreement_page();
        let step = InteractionStep::AgreementForm(AgreementDetails::default());

        let outcome = run_step(&session, &step, &fast_config()).await;

        assert!(matches!(outcome, StepOutcome::Completed));
        let log = session.log();
        let typed: Vec<&str> = log.typed.iter().map(|(_, text)| text.as_str()).collect();
        assert_eq!(typed, vec!["Company", "People", "cbr", "Russian"]);
        assert_eq!(log.clicks, vec!["input#agree".to_string()]);
    }

    #[tokio::test]
    async fn agreement_with_missing_field_fails_softly() {
        let session = FakeSession::new(&format!(r#"<form id="{}"></form>"#, pci::agreement::FORM_ID));
        let step = InteractionStep::AgreementForm(AgreementDetails::default());

        let outcome = run_step(&session, &step, &fast_config()).await;
        assert!(matches!(outcome, StepOutcome::Failed(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn directory_in_place_of_file_yields_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("doc.pdf")).unwrap();
        let session = FakeSession::new("<p>Downloading</p>");

        let name = stubborn_download(
            session.clone(),
            dir.path(),
            "https://example.com/files/doc.pdf",
            &fast_config(),
            &[],
        )
        .await
        .unwrap();

        assert_eq!(name, "");
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn keeps_polling_through_io_errors() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the download directory should be: every
        // existence check fails with ENOTDIR until it is replaced
        let dir = root.path().join("downloads");
        std::fs::write(&dir, b"").unwrap();

        let fixer = {
            let dir = dir.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                tokio::fs::remove_file(&dir).await.unwrap();
                tokio::fs::create_dir(&dir).await.unwrap();
                tokio::fs::write(dir.join("doc.pdf"), b"%PDF-1.7").await.unwrap();
            })
        };

        let name = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            stubborn_download(
                FakeSession::new("<p>Downloading</p>"),
                &dir,
                "https://example.com/files/doc.pdf",
                &fast_config(),
                &[],
            ),
        )
        .await
        .expect("the wait should outlast transient I/O errors")
        .unwrap();

        fixer.await.unwrap();
        assert_eq!(name, "doc.pdf");
    }
}
