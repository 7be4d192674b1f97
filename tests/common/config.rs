//! Live credential loading from .env

use notion_export::{Credentials, ExportConfig, NotionExporter};
use std::time::Duration;

/// Page exported by the live tests
pub const ENV_TEST_PAGE_ID: &str = "NOTION_TEST_PAGE_ID";

/// Load live credentials and a test page id from the environment
///
/// Required environment variables:
/// - `NOTION_TOKEN_V2` - `token_v2` session cookie
/// - `NOTION_FILE_TOKEN` - `file_token` download cookie
/// - `NOTION_TEST_PAGE_ID` - page the account can read
pub fn load_live_config() -> notion_export::Result<(Credentials, String)> {
    dotenvy::dotenv().ok();

    let credentials = Credentials::from_env()?;
    let page_id = std::env::var(ENV_TEST_PAGE_ID)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            notion_export::Error::config(
                format!("{} not set in environment", ENV_TEST_PAGE_ID),
                ENV_TEST_PAGE_ID,
            )
        })?;

    Ok((credentials, page_id))
}

/// Check whether live credentials are available
pub fn has_live_credentials() -> bool {
    load_live_config().is_ok()
}

/// Exporter against the real service with a bounded wait
pub fn create_live_exporter() -> notion_export::Result<(NotionExporter, String)> {
    let (credentials, page_id) = load_live_config()?;
    let config = ExportConfig {
        max_wait: Some(Duration::from_secs(300)),
        ..Default::default()
    };
    Ok((NotionExporter::new(credentials, config)?, page_id))
}
