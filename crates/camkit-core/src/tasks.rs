//! Background task submission.
//!
//! The editor never blocks on long-running work. It submits a named job with
//! JSON parameters and is later handed a [`TaskEvent`] on its own thread.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier of a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new unique job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({})", &self.0.to_string()[..8])
    }
}

/// A job handed to the background queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub id: JobId,
    pub name: String,
    pub params: Value,
}

/// How a background job ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    /// Job finished; `output` identifies what it produced
    Completed { output: String },
    /// Job failed with a reason
    Failed { reason: String },
}

/// Completion notice delivered back to the submitting session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    pub id: JobId,
    pub name: String,
    pub outcome: TaskOutcome,
}

impl TaskEvent {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Completed { .. })
    }
}

/// Queue accepting named background jobs.
pub trait TaskQueue {
    /// Enqueue `name` with `params`. Never waits for the job to run.
    fn submit(&self, name: &str, params: Value) -> Result<JobId>;
}

/// Task queue backed by an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelTaskQueue {
    sender: mpsc::UnboundedSender<TaskRequest>,
}

impl ChannelTaskQueue {
    /// Create a queue and the receiving end a worker consumes.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl TaskQueue for ChannelTaskQueue {
    fn submit(&self, name: &str, params: Value) -> Result<JobId> {
        let id = JobId::new();
        tracing::debug!(%id, task = name, "submitting background task");
        self.sender
            .send(TaskRequest {
                id,
                name: name.to_string(),
                params,
            })
            .map_err(|_| Error::TaskQueueClosed {
                task: name.to_string(),
            })?;
        Ok(id)
    }
}

/// Run `handler` for every request on a tokio task.
///
/// Completion events are sent to the returned receiver; the owning session
/// drains it on its own thread. Must be called from within a tokio runtime.
pub fn spawn_worker<F>(
    mut requests: mpsc::UnboundedReceiver<TaskRequest>,
    handler: F,
) -> (JoinHandle<()>, mpsc::UnboundedReceiver<TaskEvent>)
where
    F: Fn(&TaskRequest) -> TaskOutcome + Send + 'static,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let outcome = handler(&request);
            let event = TaskEvent {
                id: request.id,
                name: request.name,
                outcome,
            };
            if events_tx.send(event).is_err() {
                tracing::warn!("task completion receiver dropped, stopping worker");
                break;
            }
        }
    });
    (handle, events_rx)
}
