// src/sched/status.rs

use serde::{Deserialize, Serialize};

use crate::tasks::TaskId;

/// Snapshot of the scheduler's execution state.
///
/// At any instant every known task id is in exactly one of
/// `current_task_id` / `pending_tasks` / `executed_tasks` / `failed_tasks`,
/// except directly after an import (everything pending, no current task)
/// and after a `stop()` with a task in flight (the aborted task's id is
/// dropped from all buckets for that run).
///
/// Status queries hand out clones of this struct, so callers can never
/// mutate scheduler-internal state through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    /// The task currently handed to the executor, if any.
    pub current_task_id: Option<TaskId>,

    /// Ids of tasks that completed successfully, in completion order.
    pub executed_tasks: Vec<TaskId>,

    /// Ids of tasks not yet dispatched, in import order.
    pub pending_tasks: Vec<TaskId>,

    /// Ids of tasks whose execution faulted, in completion order.
    pub failed_tasks: Vec<TaskId>,

    /// Whether a run is active.
    pub is_running: bool,
}

impl ExecutionStatus {
    /// Fresh status for a newly imported set of task ids.
    pub fn for_pending(pending: Vec<TaskId>) -> Self {
        Self {
            pending_tasks: pending,
            ..Self::default()
        }
    }
}
