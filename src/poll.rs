//! Waiting for export tasks to finish
//!
//! The service has no blocking "wait for result" call. [`await_completion`]
//! polls a [`TaskSource`] on a fixed interval until the task is terminal, the
//! caller cancels, or the optional deadline passes.

use crate::error::{Error, Result};
use crate::types::{Task, TaskState};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something that can report the current state of an export task
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch the task's current state; `None` if the service does not list it
    async fn fetch_task(&self, task_id: &str) -> Result<Option<Task>>;
}

/// Polling cadence and limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay before every poll, including the first
    pub interval: Duration,
    /// Give up after this long (None = no deadline)
    pub max_wait: Option<Duration>,
}

/// Poll `task_id` until it finishes and return its export URL
///
/// Each cycle sleeps `interval` and then fetches the task once.
/// `not_started` and `in_progress` keep the loop going. `success` with a URL
/// resolves. Every other outcome, including `success` without a URL or a task
/// missing from the response, fails with [`Error::ExportTaskFailed`] without
/// polling again.
///
/// Cancelling `cancel` aborts with [`Error::Cancelled`] and passing
/// `max_wait` aborts with [`Error::TimedOut`], both during the sleep and
/// during an in-flight fetch.
pub async fn await_completion<S>(
    source: &S,
    task_id: &str,
    options: PollOptions,
    cancel: &CancellationToken,
) -> Result<String>
where
    S: TaskSource + ?Sized,
{
    let started = Instant::now();
    let deadline = options.max_wait.map(|wait| started + wait);
    let mut polls: u32 = 0;

    loop {
        wait_for_next_poll(task_id, options.interval, started, deadline, cancel).await?;

        polls += 1;
        let task = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { task_id: task_id.to_string() });
            }
            _ = sleep_until_deadline(deadline) => {
                warn!(task_id, polls, "deadline passed during task poll");
                return Err(Error::TimedOut {
                    task_id: task_id.to_string(),
                    waited: started.elapsed(),
                });
            }
            task = source.fetch_task(task_id) => task?,
        };

        let Some(task) = task else {
            warn!(task_id, polls, "task missing from getTasks response");
            return Err(Error::ExportTaskFailed {
                task_id: task_id.to_string(),
                state: "missing".to_string(),
            });
        };

        match (&task.state, task.status.export_url) {
            (TaskState::Success, Some(url)) => {
                info!(
                    task_id,
                    polls,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "export task finished"
                );
                return Ok(url);
            }
            (state, _) if state.is_pending() => {
                debug!(
                    task_id,
                    polls,
                    state = %state,
                    pages_exported = task.status.pages_exported,
                    "export task still running"
                );
            }
            (state, _) => {
                warn!(task_id, polls, state = %state, "export task failed");
                return Err(Error::ExportTaskFailed {
                    task_id: task_id.to_string(),
                    state: state.to_string(),
                });
            }
        }
    }
}

/// Resolves at `deadline`, or never when there is none
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Sleep one poll interval, bailing out early on cancellation or deadline
async fn wait_for_next_poll(
    task_id: &str,
    interval: Duration,
    started: Instant,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
) -> Result<()> {
    let wake = Instant::now() + interval;

    if let Some(deadline) = deadline
        && deadline < wake
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(Error::Cancelled { task_id: task_id.to_string() })
            }
            _ = tokio::time::sleep_until(deadline) => {
                Err(Error::TimedOut {
                    task_id: task_id.to_string(),
                    waited: started.elapsed(),
                })
            }
        }
    } else {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(Error::Cancelled { task_id: task_id.to_string() })
            }
            _ = tokio::time::sleep_until(wake) => Ok(()),
        }
    }
}
