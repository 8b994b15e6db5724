//! Stubborn download helper against a temporary download directory
use pci_document_scraper::infrastructure::config::{pci, DownloadConfig};
use pci_document_scraper::sources::download::{
    stubborn_download, AgreementDetails, InteractionStep,
};
use pci_document_scraper::test_utils::FakeSession;
use std::time::Duration;

const URL: &str = "https://www.pcisecuritystandards.org/documents/PCI-DSS-v4_0.pdf";

fn fast_config() -> DownloadConfig {
    DownloadConfig {
        settle_after_navigation_ms: 0,
        step_wait_secs: 0,
        poll_interval_ms: 10,
        ..DownloadConfig::default()
    }
}

fn blank_page() -> FakeSession {
    FakeSession::new("<p>Downloading</p>")
}

fn all_steps() -> Vec<InteractionStep> {
    vec![
        InteractionStep::CookieBanner,
        InteractionStep::AgreementForm(AgreementDetails::default()),
    ]
}

#[tokio::test]
async fn file_already_present_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("PCI-DSS-v4_0.pdf"), b"%PDF-1.7").unwrap();
    let session = blank_page();

    let name = stubborn_download(session.clone(), dir.path(), URL, &fast_config(), &all_steps())
        .await
        .unwrap();

    assert_eq!(name, "PCI-DSS-v4_0.pdf");
    let log = session.log();
    assert_eq!(log.navigations, vec![URL.to_string()]);
    assert_eq!(log.page_load_timeout, Some(Duration::from_secs(60)));
    assert_eq!(log.close_calls, 1);
}

#[tokio::test]
async fn waits_for_file_that_arrives_later() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("PCI-DSS-v4_0.pdf");
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::fs::write(target, b"%PDF-1.7").await.unwrap();
    });

    let name = tokio::time::timeout(
        Duration::from_secs(10),
        stubborn_download(blank_page(), dir.path(), URL, &fast_config(), &[]),
    )
    .await
    .expect("download should finish once the file lands")
    .unwrap();

    writer.await.unwrap();
    assert_eq!(name, "PCI-DSS-v4_0.pdf");
}

#[tokio::test]
async fn never_returns_when_file_never_appears() {
    let dir = tempfile::tempdir().unwrap();
    let session = blank_page();

    let outcome = tokio::time::timeout(
        Duration::from_millis(300),
        stubborn_download(session.clone(), dir.path(), URL, &fast_config(), &[]),
    )
    .await;

    assert!(outcome.is_err(), "the wait for the file has no deadline of its own");
    assert_eq!(session.log().navigations.len(), 1);
}

#[tokio::test]
async fn failing_optional_steps_do_not_stop_the_download() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("PCI-DSS-v4_0.pdf"), b"%PDF-1.7").unwrap();
    // Banner never becomes clickable, form has no fields
    let session = FakeSession::new(&format!(
        r#"<button id="{}" disabled>Accept</button><form id="{}"></form>"#,
        pci::COOKIE_ACCEPT_ID,
        pci::agreement::FORM_ID,
    ));

    let name = stubborn_download(session.clone(), dir.path(), URL, &fast_config(), &all_steps())
        .await
        .unwrap();

    assert_eq!(name, "PCI-DSS-v4_0.pdf");
    assert!(session.log().clicks.is_empty());
    assert!(session.is_closed());
}

#[tokio::test]
async fn navigation_failure_still_closes_the_browser() {
    let dir = tempfile::tempdir().unwrap();
    let session = blank_page().failing_navigation();

    let result = stubborn_download(session.clone(), dir.path(), URL, &fast_config(), &[]).await;

    assert!(result.is_err());
    assert_eq!(session.log().close_calls, 1);
}
