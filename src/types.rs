//! Wire types for the Notion task API

use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;

/// Export format requested from the service
pub const EXPORT_TYPE_MARKDOWN: &str = "markdown";

/// Event name for block export tasks
pub const EVENT_EXPORT_BLOCK: &str = "exportBlock";

/// Body of `POST enqueueTask`
#[derive(Clone, Debug, Serialize)]
pub struct EnqueueTaskRequest {
    /// The task to enqueue
    pub task: ExportTask,
}

/// Task envelope inside [`EnqueueTaskRequest`]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTask {
    /// Always "exportBlock"
    pub event_name: String,
    /// Export parameters
    pub request: ExportRequest,
}

/// Export parameters for a single block
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Block being exported
    pub block: BlockRef,
    /// Export child pages
    pub recursive: bool,
    /// Comments are never exported
    pub should_export_comments: bool,
    /// Format options
    pub export_options: ExportOptions,
}

/// Reference to a block by canonical id
#[derive(Clone, Debug, Serialize)]
pub struct BlockRef {
    /// Dashed block id
    pub id: String,
}

/// Format options sent with an export
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Always "markdown"
    pub export_type: String,
    /// Time zone for rendered dates
    pub time_zone: String,
    /// Locale for rendered content
    pub locale: String,
    /// "currentView" or "all"
    pub collection_view_export_type: String,
}

impl EnqueueTaskRequest {
    /// Build a Markdown export request for an already-normalized block id
    pub fn markdown_export(block_id: &str, config: &ExportConfig) -> Self {
        Self {
            task: ExportTask {
                event_name: EVENT_EXPORT_BLOCK.to_string(),
                request: ExportRequest {
                    block: BlockRef {
                        id: block_id.to_string(),
                    },
                    recursive: config.recursive,
                    should_export_comments: false,
                    export_options: ExportOptions {
                        export_type: EXPORT_TYPE_MARKDOWN.to_string(),
                        time_zone: config.time_zone.clone(),
                        locale: config.locale.clone(),
                        collection_view_export_type: config
                            .collection_view_export_type
                            .as_str()
                            .to_string(),
                    },
                },
            },
        }
    }
}

/// Response of `POST enqueueTask`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueTaskResponse {
    /// Id of the new task
    pub task_id: Option<String>,
}

/// Body of `POST getTasks`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksRequest {
    /// Ids of the tasks to fetch
    pub task_ids: Vec<String>,
}

/// Response of `POST getTasks`
#[derive(Clone, Debug, Deserialize)]
pub struct GetTasksResponse {
    /// Matching tasks (order not guaranteed)
    #[serde(default)]
    pub results: Vec<Task>,
}

/// Observed state of an export task
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TaskState {
    /// Queued, not yet picked up
    NotStarted,
    /// Running
    InProgress,
    /// Finished successfully
    Success,
    /// Finished with an error; holds the wire name ("failure" or "failed")
    Failure(String),
    /// Anything the service reports that we do not recognise
    Other(String),
}

impl TaskState {
    /// Wire name of this state
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::NotStarted => "not_started",
            TaskState::InProgress => "in_progress",
            TaskState::Success => "success",
            TaskState::Failure(s) => s,
            TaskState::Other(s) => s,
        }
    }

    /// Returns true while the task may still finish
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::NotStarted | TaskState::InProgress)
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "not_started" => TaskState::NotStarted,
            "in_progress" => TaskState::InProgress,
            "success" => TaskState::Success,
            "failure" | "failed" => TaskState::Failure(s),
            _ => TaskState::Other(s),
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One export task as reported by `getTasks`
#[derive(Clone, Debug, Deserialize)]
pub struct Task {
    /// Task id
    pub id: String,
    /// Current state
    pub state: TaskState,
    /// Progress and result details
    #[serde(default)]
    pub status: TaskStatus,
}

/// Progress and result details of a task
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Signed URL of the finished archive
    #[serde(rename = "exportURL")]
    pub export_url: Option<String>,
    /// Pages exported so far
    pub pages_exported: Option<u64>,
}
