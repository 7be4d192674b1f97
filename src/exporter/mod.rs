//! Export facade
//!
//! [`NotionExporter`] strings the pieces together: normalize the id, enqueue
//! an export task, poll it, download the archive and pick files out of it.
//! It holds no mutable state, so one exporter can serve many concurrent
//! exports over the same connection pool.

use crate::archive::Archive;
use crate::client::NotionClient;
use crate::config::{ClientConfig, Credentials, ExportConfig, ExportOverrides};
use crate::error::{Error, Result};
use crate::id;
use crate::poll::{PollOptions, await_completion};
use crate::select::{is_csv, is_markdown, select_all, select_first};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;


/// Exports Notion blocks as Markdown archives
///
/// # Example
///
/// ```no_run
/// use notion_export::{Credentials, ExportConfig, ExportOverrides, NotionExporter};
///
/// # async fn example() -> notion_export::Result<()> {
/// let exporter = NotionExporter::new(
///     Credentials::new("token_v2 cookie", "file_token cookie"),
///     ExportConfig::default(),
/// )?;
/// let pages = exporter
///     .export("0123456789abcdef0123456789abcdef", &ExportOverrides::recursive(true))
///     .await?;
/// println!("exported {} Markdown files", pages.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct NotionExporter {
    client: NotionClient,
    config: ExportConfig,
}

impl NotionExporter {
    /// Exporter talking to notion.so with the given credentials
    pub fn new(credentials: Credentials, config: ExportConfig) -> Result<Self> {
        Self::with_client_config(&ClientConfig::new(credentials), config)
    }

    /// Exporter with full control over the transport
    pub fn with_client_config(client_config: &ClientConfig, config: ExportConfig) -> Result<Self> {
        Ok(Self {
            client: NotionClient::new(client_config)?,
            config,
        })
    }

    /// Default export options applied to every call
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `raw_id` and return the trimmed text of every Markdown file
    ///
    /// `overrides` are merged onto the exporter's defaults for this call only.
    /// An archive without Markdown files yields an empty list.
    pub async fn export(&self, raw_id: &str, overrides: &ExportOverrides) -> Result<Vec<String>> {
        self.export_with_cancel(raw_id, overrides, &CancellationToken::new())
            .await
    }

    /// Like [`export`](Self::export), abandoning the poll when `cancel` fires
    pub async fn export_with_cancel(
        &self,
        raw_id: &str,
        overrides: &ExportOverrides,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let config = self.config.merge(overrides);
        let archive = self.archive_for(raw_id, &config, cancel).await?;
        let pages = select_all(&archive, is_markdown);
        info!(
            entries = archive.len(),
            markdown = pages.len(),
            "export complete"
        );
        Ok(pages)
    }

    /// Enqueue an export task for `id` and return its task id
    pub async fn request_export(&self, raw_id: &str, config: &ExportConfig) -> Result<String> {
        let block_id = canonical_block_id(raw_id)?;
        self.client.enqueue_export(&block_id, config).await
    }

    /// Poll `task_id` until it finishes and return the archive URL
    pub async fn await_completion(
        &self,
        task_id: &str,
        config: &ExportConfig,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let options = PollOptions {
            interval: config.poll_interval,
            max_wait: config.max_wait,
        };
        await_completion(&self.client, task_id, options, cancel).await
    }

    /// Download and parse the archive at `url`
    pub async fn fetch_archive(&self, url: &str) -> Result<Archive> {
        self.client.fetch_archive(url).await
    }

    /// Enqueue an export of `id` with the default options and return the task id
    pub async fn task_id(&self, raw_id: &str) -> Result<String> {
        self.request_export(raw_id, &self.config).await
    }

    /// Export `id` and return the URL of the finished archive
    pub async fn zip_url(&self, raw_id: &str) -> Result<String> {
        let task_id = self.task_id(raw_id).await?;
        self.await_completion(&task_id, &self.config, &CancellationToken::new())
            .await
    }

    /// Export `id` and return the downloaded archive
    pub async fn zip(&self, raw_id: &str) -> Result<Archive> {
        self.archive_for(raw_id, &self.config, &CancellationToken::new())
            .await
    }

    /// Export `id` and write every archive entry below `dest`
    pub async fn export_to_dir(&self, raw_id: &str, dest: &Path) -> Result<Vec<PathBuf>> {
        let archive = self.zip(raw_id).await?;
        archive.extract_to(dest)
    }

    /// Export `id` and return the first entry matching `predicate`
    pub async fn file_string<P>(&self, raw_id: &str, predicate: P) -> Result<String>
    where
        P: Fn(&str) -> bool,
    {
        let archive = self.zip(raw_id).await?;
        select_first(&archive, predicate)
    }

    /// Export `id` and return every entry matching `predicate`
    pub async fn all_file_strings<P>(&self, raw_id: &str, predicate: P) -> Result<Vec<String>>
    where
        P: Fn(&str) -> bool,
    {
        let archive = self.zip(raw_id).await?;
        Ok(select_all(&archive, predicate))
    }

    /// Export `id` and return its first Markdown file
    pub async fn md_string(&self, raw_id: &str) -> Result<String> {
        self.file_string(raw_id, is_markdown).await
    }

    /// Export `id` and return every Markdown file
    pub async fn all_md_strings(&self, raw_id: &str) -> Result<Vec<String>> {
        self.all_file_strings(raw_id, is_markdown).await
    }

    /// Export a database and return its CSV
    ///
    /// With `only_current_view` the first CSV is returned, otherwise the
    /// `_all.csv` variant holding every row.
    pub async fn csv_string(&self, raw_id: &str, only_current_view: bool) -> Result<String> {
        self.file_string(raw_id, is_csv(only_current_view)).await
    }

    async fn archive_for(
        &self,
        raw_id: &str,
        config: &ExportConfig,
        cancel: &CancellationToken,
    ) -> Result<Archive> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled {
                task_id: String::new(),
            });
        }
        let task_id = self.request_export(raw_id, config).await?;
        let url = self.await_completion(&task_id, config, cancel).await?;
        self.fetch_archive(&url).await
    }
}

/// Validate and normalize a caller-supplied block id
fn canonical_block_id(raw_id: &str) -> Result<String> {
    let trimmed = raw_id.trim();
    if !id::is_valid_block_id(trimmed) {
        return Err(Error::InvalidBlockId(format!(
            "'{}' is not 32 hex digits",
            trimmed
        )));
    }
    Ok(id::normalize(trimmed))
}
