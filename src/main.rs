use clap::Parser;
use notion_export::config::{DEFAULT_BASE_URL, ENV_FILE_TOKEN, ENV_TOKEN_V2};
use notion_export::{ClientConfig, Credentials, ExportConfig, NotionExporter};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "notion-export-mcp")]
#[command(about = "MCP stdio server exporting Notion pages to Markdown")]
#[command(version)]
struct Cli {
    /// Notion `token_v2` cookie
    #[arg(long, env = ENV_TOKEN_V2, hide_env_values = true)]
    token_v2: String,

    /// Notion `file_token` cookie
    #[arg(long, env = ENV_FILE_TOKEN, hide_env_values = true)]
    file_token: String,

    /// Notion API base URL
    #[arg(long, env = "NOTION_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Delay between task status polls, in milliseconds
    #[arg(long, env = "NOTION_POLL_INTERVAL_MS", default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Abandon an export after this many seconds (0 = wait forever)
    #[arg(long, env = "NOTION_MAX_WAIT_SECS", default_value_t = 600)]
    max_wait_secs: u64,

    /// Per-request HTTP timeout in seconds (0 = none)
    #[arg(long, env = "NOTION_REQUEST_TIMEOUT_SECS", default_value_t = 0)]
    request_timeout_secs: u64,

    /// Time zone for rendered dates
    #[arg(long, env = "NOTION_TIME_ZONE", default_value = "UTC")]
    time_zone: String,

    /// Locale for rendered content
    #[arg(long, env = "NOTION_LOCALE", default_value = "en")]
    locale: String,
}

impl Cli {
    fn client_config(&self) -> notion_export::Result<ClientConfig> {
        // Same blank-value checks as loading straight from the environment
        let credentials = Credentials::from_lookup(|key| match key {
            ENV_TOKEN_V2 => Some(self.token_v2.clone()),
            ENV_FILE_TOKEN => Some(self.file_token.clone()),
            _ => None,
        })?;
        let mut config = ClientConfig::new(credentials).with_base_url(&self.base_url);
        config.request_timeout = non_zero_secs(self.request_timeout_secs);
        Ok(config)
    }

    fn export_config(&self) -> ExportConfig {
        ExportConfig {
            time_zone: self.time_zone.clone(),
            locale: self.locale.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_wait: non_zero_secs(self.max_wait_secs),
            ..Default::default()
        }
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[tokio::main]
async fn main() -> notion_export::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let exporter = cli
        .client_config()
        .and_then(|client| NotionExporter::with_client_config(&client, cli.export_config()))
        .inspect_err(|e| tracing::error!(error = %e, "failed to configure exporter"))?;

    notion_export::run_with_shutdown(exporter)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Fatal error in server loop"))?;
    Ok(())
}
