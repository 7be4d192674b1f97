//! Configuration types for notion-export

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Notion private API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.notion.so/api/v3/";

/// Environment variable holding the `token_v2` cookie
pub const ENV_TOKEN_V2: &str = "NOTION_TOKEN_V2";

/// Environment variable holding the `file_token` cookie
pub const ENV_FILE_TOKEN: &str = "NOTION_FILE_TOKEN";

/// Which rows of a database are exported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionViewExportType {
    /// Only the rows visible in the current view
    CurrentView,
    /// Every row of the database (default)
    #[default]
    All,
}

impl CollectionViewExportType {
    /// Wire name sent to the service
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionViewExportType::CurrentView => "currentView",
            CollectionViewExportType::All => "all",
        }
    }
}

/// Options for one export run
///
/// Immutable once built. Use [`ExportConfig::merge`] to overlay per-call
/// overrides onto an exporter's defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Export child pages recursively (default: false)
    #[serde(default)]
    pub recursive: bool,

    /// Time zone used for rendered dates (default: "UTC")
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Locale used for rendered content (default: "en")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Export all database rows or only the current view (default: all)
    #[serde(default)]
    pub collection_view_export_type: CollectionViewExportType,

    /// Delay before each task status poll (default: 1000 ms)
    #[serde(
        default = "default_poll_interval",
        rename = "pollIntervalMs",
        with = "duration_ms_serde"
    )]
    pub poll_interval: Duration,

    /// Give up polling after this long (None = wait until the task finishes)
    #[serde(default, rename = "maxWaitMs", with = "optional_duration_ms_serde")]
    pub max_wait: Option<Duration>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            time_zone: default_time_zone(),
            locale: default_locale(),
            collection_view_export_type: CollectionViewExportType::default(),
            poll_interval: default_poll_interval(),
            max_wait: None,
        }
    }
}

impl ExportConfig {
    /// Overlay `overrides` onto this config, returning a new value
    ///
    /// A zero poll interval is replaced by the default, since the service
    /// should never be polled in a tight loop.
    pub fn merge(&self, overrides: &ExportOverrides) -> Self {
        let poll_interval = overrides.poll_interval.unwrap_or(self.poll_interval);
        Self {
            recursive: overrides.recursive.unwrap_or(self.recursive),
            time_zone: overrides
                .time_zone
                .clone()
                .unwrap_or_else(|| self.time_zone.clone()),
            locale: overrides
                .locale
                .clone()
                .unwrap_or_else(|| self.locale.clone()),
            collection_view_export_type: overrides
                .collection_view_export_type
                .unwrap_or(self.collection_view_export_type),
            poll_interval: if poll_interval.is_zero() {
                default_poll_interval()
            } else {
                poll_interval
            },
            max_wait: overrides.max_wait.or(self.max_wait),
        }
    }
}

/// Caller-supplied overrides for a single export
///
/// Every field is optional; unset fields fall back to the exporter's config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOverrides {
    /// Override `recursive`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,

    /// Override `time_zone`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Override `locale`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Override `collection_view_export_type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_view_export_type: Option<CollectionViewExportType>,

    /// Override `poll_interval`
    #[serde(
        default,
        rename = "pollIntervalMs",
        with = "optional_duration_ms_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_interval: Option<Duration>,

    /// Override `max_wait`
    #[serde(
        default,
        rename = "maxWaitMs",
        with = "optional_duration_ms_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_wait: Option<Duration>,
}

impl ExportOverrides {
    /// Overrides that only set the `recursive` flag
    pub fn recursive(recursive: bool) -> Self {
        Self {
            recursive: Some(recursive),
            ..Default::default()
        }
    }
}

/// Session cookies used to authenticate against Notion
///
/// Both values are opaque and obtained out of band (browser cookies).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The `token_v2` cookie value
    pub token_v2: String,
    /// The `file_token` cookie value
    pub file_token: String,
}

impl Credentials {
    /// Create credentials from the two cookie values
    pub fn new(token_v2: impl Into<String>, file_token: impl Into<String>) -> Self {
        Self {
            token_v2: token_v2.into(),
            file_token: file_token.into(),
        }
    }

    /// Load credentials from `NOTION_TOKEN_V2` and `NOTION_FILE_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup
    ///
    /// Missing and empty values are both rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::config(
                    format!("{key} environment variable is required"),
                    key,
                )),
            }
        };
        Ok(Self {
            token_v2: fetch(ENV_TOKEN_V2)?,
            file_token: fetch(ENV_FILE_TOKEN)?,
        })
    }

    /// Value for the `Cookie` header sent on every request
    pub fn cookie_header(&self) -> String {
        format!("token_v2={};file_token={}", self.token_v2, self.file_token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token_v2", &"<redacted>")
            .field("file_token", &"<redacted>")
            .finish()
    }
}

/// Transport configuration for [`NotionClient`](crate::client::NotionClient)
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API base URL (default: "https://www.notion.so/api/v3/")
    pub base_url: String,

    /// Session cookies
    pub credentials: Credentials,

    /// Per-request timeout (None = reqwest default, no timeout)
    pub request_timeout: Option<Duration>,

    /// Connect timeout (None = reqwest default)
    pub connect_timeout: Option<Duration>,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Transport config for the public Notion API with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            request_timeout: None,
            connect_timeout: None,
            user_agent: default_user_agent(),
        }
    }

    /// Replace the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// Optional Duration serialization helper (milliseconds)
mod optional_duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
