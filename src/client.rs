//! Authenticated transport for the Notion task API
//!
//! [`NotionClient`] owns one `reqwest::Client` configured with the session
//! cookie, so every call (enqueue, poll, archive download) shares a
//! connection pool and the same credentials.

use crate::archive::Archive;
use crate::config::{ClientConfig, ExportConfig};
use crate::error::{Error, Result};
use crate::poll::TaskSource;
use crate::types::{
    EnqueueTaskRequest, EnqueueTaskResponse, GetTasksRequest, GetTasksResponse, Task,
};
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

/// Longest response body kept in [`Error::RemoteStatus`]
const MAX_ERROR_BODY: usize = 512;

const ENQUEUE_TASK: &str = "enqueueTask";
const GET_TASKS: &str = "getTasks";
/// Label for archive downloads; the signed URL itself is kept out of errors
const EXPORT_DOWNLOAD: &str = "export download";

/// HTTP client for the Notion private API
#[derive(Clone, Debug)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NotionClient {
    /// Build a client from transport configuration
    ///
    /// Fails with [`Error::Config`] if the base URL does not parse or the
    /// credentials cannot be sent as a header.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut cookie =
            HeaderValue::from_str(&config.credentials.cookie_header()).map_err(|_| {
                Error::config(
                    "credentials contain characters not allowed in a Cookie header",
                    "credentials",
                )
            })?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let http = builder.build().map_err(|e| Error::Config {
            message: format!("failed to build HTTP client: {}", e),
            key: None,
        })?;

        Ok(Self { http, base_url })
    }

    /// Base URL all API endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Enqueue a Markdown export of `block_id` and return the task id
    ///
    /// `block_id` must already be in canonical dashed form.
    pub async fn enqueue_export(&self, block_id: &str, config: &ExportConfig) -> Result<String> {
        let body = EnqueueTaskRequest::markdown_export(block_id, config);
        let resp: EnqueueTaskResponse = self.post_json(ENQUEUE_TASK, &body).await?;

        let task_id = resp
            .task_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::UnexpectedResponse {
                endpoint: ENQUEUE_TASK.to_string(),
                reason: "response has no taskId".to_string(),
            })?;

        info!(
            block_id,
            task_id = %task_id,
            recursive = config.recursive,
            "export task enqueued"
        );
        Ok(task_id)
    }

    /// Fetch a single task by id, scanning the `getTasks` results for it
    pub async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let body = GetTasksRequest {
            task_ids: vec![task_id.to_string()],
        };
        let resp: GetTasksResponse = self.post_json(GET_TASKS, &body).await?;
        Ok(resp.results.into_iter().find(|t| t.id == task_id))
    }

    /// Download the bytes at `url` with the session cookie attached
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("downloading export archive");
        let resp = self.http.get(url).send().await?;
        let resp = check_status(EXPORT_DOWNLOAD, resp).await?;
        let bytes = resp.bytes().await?;
        info!(size = bytes.len(), "export archive downloaded");
        Ok(bytes.to_vec())
    }

    /// Download and parse the export archive at `url`
    pub async fn fetch_archive(&self, url: &str) -> Result<Archive> {
        let bytes = self.download(url).await?;
        Archive::from_bytes(bytes)
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(endpoint).map_err(|e| Error::Config {
            message: format!("cannot resolve endpoint {}: {}", endpoint, e),
            key: Some("base_url".to_string()),
        })?;

        let resp = self.http.post(url).json(body).send().await?;
        let resp = check_status(endpoint, resp).await?;
        let bytes = resp.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| Error::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            reason: format!("invalid JSON: {}", e),
        })
    }
}

#[async_trait]
impl TaskSource for NotionClient {
    async fn fetch_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.get_task(task_id).await
    }
}

/// Turn non-2xx responses into [`Error::RemoteStatus`]
async fn check_status(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(Error::RemoteStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Parse the base URL, making sure it ends in `/` so endpoints join beneath it
fn parse_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| Error::config(format!("invalid base URL '{raw}': {e}"), "base_url"))
}
