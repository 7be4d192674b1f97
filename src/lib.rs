//! # notion-export
//!
//! Export Notion pages, blocks and databases to Markdown.
//!
//! Notion has no synchronous export endpoint. An export is a server-side task
//! that is enqueued, polled until it finishes, and then downloaded as a zip
//! archive. This crate drives that cycle and hands back the text of the files
//! inside the archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use notion_export::{Credentials, ExportConfig, ExportOverrides, NotionExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let exporter = NotionExporter::new(Credentials::from_env()?, ExportConfig::default())?;
//!
//!     let pages = exporter
//!         .export("0123456789abcdef0123456789abcdef", &ExportOverrides::default())
//!         .await?;
//!     for page in pages {
//!         println!("{page}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The `notion-export-mcp` binary serves the same operation as an MCP tool
//! over stdio; see [`mcp`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// In-memory export archives
pub mod archive;
/// HTTP transport for the task API
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Export facade
pub mod exporter;
/// Block id normalization
pub mod id;
/// MCP stdio tool server
pub mod mcp;
/// Task polling
pub mod poll;
/// Archive entry selection
pub mod select;
/// Task API wire types
pub mod types;

// Re-export commonly used types
pub use archive::{Archive, ArchiveEntry};
pub use client::NotionClient;
pub use config::{
    ClientConfig, CollectionViewExportType, Credentials, ExportConfig, ExportOverrides,
};
pub use error::{Error, Result, ToToolError};
pub use exporter::NotionExporter;
pub use poll::{PollOptions, TaskSource};
pub use types::{Task, TaskState};

use tokio_util::sync::CancellationToken;

/// Serve the MCP tool on stdio until stdin closes or a termination signal arrives
///
/// Ctrl+C stops the server everywhere; SIGTERM does too on unix.
pub async fn run_with_shutdown(exporter: NotionExporter) -> Result<()> {
    let cancel = CancellationToken::new();
    let signal_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            cancel.cancel();
        })
    };

    let server = mcp::McpServer::new(exporter);
    let outcome = server.run_stdio(&cancel).await;
    signal_task.abort();
    outcome.map_err(Error::Io)
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it
async fn wait_for_signal() {
    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => tracing::info!("interrupted, stopping MCP server"),
            // No interrupt handler means only SIGTERM or EOF can stop us
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for Ctrl+C");
                terminate().await;
            }
        },
        _ = terminate() => tracing::info!("terminated, stopping MCP server"),
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
