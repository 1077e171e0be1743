// src/sched/resolver.rs

use crate::tasks::{TaskId, TaskSet};

/// Pick the next executable task from `pending`, or `None` if no pending
/// task is eligible.
///
/// Scans `pending` in its current order and returns the **first** task whose
/// every dependency id is already present in `executed` (first-fit; import
/// order is the tie-break, not a globally optimal topological sort).
///
/// - A pending id with no matching record in `tasks` is skipped, not treated
///   as an error.
/// - `None` covers cycles, dependencies on failed tasks and dependencies on
///   ids that do not exist; the resolver does not distinguish between them.
pub fn select_next_executable(
    pending: &[TaskId],
    executed: &[TaskId],
    tasks: &TaskSet,
) -> Option<TaskId> {
    pending.iter().find_map(|id| {
        let task = tasks.get(id)?;
        let eligible = task
            .depends_on
            .iter()
            .all(|dep| executed.iter().any(|done| done == dep));
        eligible.then(|| id.clone())
    })
}
