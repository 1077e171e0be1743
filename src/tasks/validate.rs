// src/tasks/validate.rs

use std::collections::HashSet;

use crate::errors::{Result, SchedulerError};
use crate::tasks::model::TaskSet;

/// Run import-time validation against a parsed task set.
///
/// This checks:
/// - every task id is non-empty
/// - no task id appears more than once
///
/// It deliberately does **not** check:
/// - dependency references (unknown ids are legal and simply never become
///   eligible)
/// - cycles (a cyclic set imports fine; the run terminates with the cycle
///   members still pending)
pub fn validate_task_set(set: &TaskSet) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, task) in set.iter().enumerate() {
        if task.id.is_empty() {
            return Err(SchedulerError::InvalidTaskSet(format!(
                "task at index {idx} has an empty id"
            )));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(SchedulerError::InvalidTaskSet(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }

    Ok(())
}
