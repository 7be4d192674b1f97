//! End-to-end tests against the real Notion service
//!
//! These tests use credentials from .env and are marked #[ignore] so they
//! never run in normal CI.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --test e2e_live -- --ignored --nocapture
//! ```
//!
//! # Required environment variables (.env file)
//!
//! - `NOTION_TOKEN_V2` - `token_v2` session cookie
//! - `NOTION_FILE_TOKEN` - `file_token` download cookie
//! - `NOTION_TEST_PAGE_ID` - page the account can read

mod common;

use common::{create_live_exporter, has_live_credentials};
use notion_export::{Credentials, Error, ExportConfig, ExportOverrides, NotionExporter};

#[tokio::test]
#[ignore]
async fn test_export_single_page() {
    if !has_live_credentials() {
        eprintln!("Skipping: Notion credentials not found in .env");
        return;
    }

    let (exporter, page_id) = create_live_exporter().unwrap();
    let pages = exporter
        .export(&page_id, &ExportOverrides::recursive(false))
        .await
        .unwrap();

    assert_eq!(pages.len(), 1, "single-page export should yield one file");
    println!("Exported {} bytes of Markdown", pages[0].len());
}

#[tokio::test]
#[ignore]
async fn test_recursive_export_includes_root() {
    if !has_live_credentials() {
        eprintln!("Skipping: Notion credentials not found in .env");
        return;
    }

    let (exporter, page_id) = create_live_exporter().unwrap();
    let flat = exporter
        .export(&page_id, &ExportOverrides::recursive(false))
        .await
        .unwrap();
    let nested = exporter
        .export(&page_id, &ExportOverrides::recursive(true))
        .await
        .unwrap();

    assert!(nested.len() >= flat.len());
    println!("Recursive export returned {} files", nested.len());
}

#[tokio::test]
#[ignore]
async fn test_bad_token_is_rejected() {
    if !has_live_credentials() {
        eprintln!("Skipping: Notion credentials not found in .env");
        return;
    }

    let (_, page_id) = create_live_exporter().unwrap();
    let exporter = NotionExporter::new(
        Credentials::new("invalid_token_12345", "invalid_file_token_12345"),
        ExportConfig::default(),
    )
    .unwrap();

    let err = exporter
        .export(&page_id, &ExportOverrides::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::RemoteStatus { .. } | Error::UnexpectedResponse { .. }),
        "expected rejection, got {err:?}"
    );
}
