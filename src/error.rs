//! Error types for notion-export
//!
//! All fallible operations return [`Result`], whose error side is the single
//! [`Error`] enum below. Variants fall into four groups:
//! - remote failures (transport, HTTP status, malformed service responses)
//! - export task failures reported by the service
//! - archive problems (corrupt zip, requested file type absent)
//! - local problems (configuration, cancellation, deadlines, I/O)
//!
//! Nothing here is retried internally. Callers decide on retry policy.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for notion-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for notion-export
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "NOTION_TOKEN_V2")
        key: Option<String>,
    },

    /// Block id does not contain 32 hex digits once dashes are removed
    #[error("invalid block id: {0}")]
    InvalidBlockId(String),

    /// Transport-level failure talking to the remote service
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote service answered with a non-success HTTP status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    RemoteStatus {
        /// Endpoint name or URL that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Remote service answered 2xx but the payload was not what we expected
    #[error("unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse {
        /// Endpoint name that was called
        endpoint: String,
        /// What was wrong with the payload
        reason: String,
    },

    /// Export task reached a terminal state other than success
    #[error("export task {task_id} failed in state '{state}'")]
    ExportTaskFailed {
        /// Task id assigned by the service
        task_id: String,
        /// Last state observed while polling
        state: String,
    },

    /// Downloaded bytes are not a readable zip archive
    #[error("corrupt archive: {0}")]
    CorruptArchive(#[from] zip::result::ZipError),

    /// No archive entry matched the requested file type
    #[error("could not find file in archive: {0}")]
    NoMatch(String),

    /// Polling was abandoned through a cancellation token
    #[error("export task {task_id} was cancelled")]
    Cancelled {
        /// Task id being polled, empty if cancelled before enqueue
        task_id: String,
    },

    /// Polling exceeded the configured maximum wait
    #[error("export task {task_id} did not finish within {waited:?}")]
    TimedOut {
        /// Task id being polled
        task_id: String,
        /// Time spent waiting before giving up
        waited: Duration,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Returns true if the failure originated at the remote service or transport
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::RemoteStatus { .. } | Error::UnexpectedResponse { .. }
        )
    }
}

/// Map errors onto the tool protocol's error vocabulary
///
/// The stdio tool server uses this to pick a JSON-RPC error code and a
/// machine-readable code string for logs and structured error payloads.
pub trait ToToolError {
    /// JSON-RPC error code for this error
    fn rpc_code(&self) -> i64;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

/// JSON-RPC "invalid params"
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC "internal error"
pub const RPC_INTERNAL_ERROR: i64 = -32603;
/// Implementation-defined server error range start, used for remote failures
pub const RPC_SERVER_ERROR: i64 = -32000;

impl ToToolError for Error {
    fn rpc_code(&self) -> i64 {
        match self {
            // Bad input from the caller
            Error::InvalidBlockId(_) => RPC_INVALID_PARAMS,

            // Upstream service problems
            Error::Network(_)
            | Error::RemoteStatus { .. }
            | Error::UnexpectedResponse { .. }
            | Error::ExportTaskFailed { .. }
            | Error::CorruptArchive(_)
            | Error::NoMatch(_)
            | Error::Cancelled { .. }
            | Error::TimedOut { .. } => RPC_SERVER_ERROR,

            // Local failures
            Error::Config { .. } | Error::Io(_) | Error::Serialization(_) => RPC_INTERNAL_ERROR,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidBlockId(_) => "invalid_block_id",
            Error::Network(_) => "network_error",
            Error::RemoteStatus { .. } => "remote_status",
            Error::UnexpectedResponse { .. } => "unexpected_response",
            Error::ExportTaskFailed { .. } => "export_task_failed",
            Error::CorruptArchive(_) => "corrupt_archive",
            Error::NoMatch(_) => "no_match",
            Error::Cancelled { .. } => "cancelled",
            Error::TimedOut { .. } => "timed_out",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_task_failed_message_names_task_and_state() {
        let err = Error::ExportTaskFailed {
            task_id: "task-1".to_string(),
            state: "failure".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "export task task-1 failed in state 'failure'"
        );
        assert_eq!(err.error_code(), "export_task_failed");
        assert!(!err.is_remote());
    }

    #[test]
    fn remote_status_is_remote_and_maps_to_server_error() {
        let err = Error::RemoteStatus {
            endpoint: "enqueueTask".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert!(err.is_remote());
        assert_eq!(err.rpc_code(), RPC_SERVER_ERROR);
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[test]
    fn invalid_block_id_maps_to_invalid_params() {
        let err = Error::InvalidBlockId("xyz".to_string());
        assert_eq!(err.rpc_code(), RPC_INVALID_PARAMS);
        assert_eq!(err.error_code(), "invalid_block_id");
    }

    #[test]
    fn config_helper_records_key() {
        match Error::config("missing", "NOTION_TOKEN_V2") {
            Error::Config { message, key } => {
                assert_eq!(message, "missing");
                assert_eq!(key.as_deref(), Some("NOTION_TOKEN_V2"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn zip_error_converts_to_corrupt_archive() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad header").into();
        assert_eq!(err.error_code(), "corrupt_archive");
        assert!(err.to_string().starts_with("corrupt archive"));
    }
}
