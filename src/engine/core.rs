// src/engine/core.rs

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::events::SchedulerEvent;
use crate::sched::{select_next_executable, ExecutionStatus};
use crate::tasks::{parse_task_set, validate_task_set, Task, TaskId, TaskSet};

/// Side effect requested by the core, executed by the runtime shell.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCommand {
    /// Hand a task to the dispatch backend.
    Dispatch(Task),
    /// Broadcast an event to subscribers.
    Emit(SchedulerEvent),
    /// Schedule a delayed `AdvanceDue { run_id }` tick.
    ScheduleAdvance { run_id: u64 },
}

/// Commands produced by one core transition.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
}

impl CoreStep {
    pub fn none() -> Self {
        Self::default()
    }

    fn emit(event: SchedulerEvent) -> Self {
        Self {
            commands: vec![CoreCommand::Emit(event)],
        }
    }

    fn push(&mut self, command: CoreCommand) {
        self.commands.push(command);
    }
}

/// Pure scheduler state machine.
///
/// Owns the imported task set and the execution bookkeeping. Every method
/// is a synchronous transition that mutates state and returns the side
/// effects the shell must perform. No IO, no channels, no clocks: the
/// runtime feeds it events and executes the resulting [`CoreStep`].
#[derive(Debug, Default)]
pub struct SchedulerCore {
    tasks: TaskSet,
    status: ExecutionStatus,
    /// Incremented on every `start()`. Advance ticks carry the run id they
    /// were scheduled under so ticks from an aborted run are discarded.
    run_counter: u64,
}

impl SchedulerCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status.clone()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Replace the task set from a raw JSON payload.
    ///
    /// On any parse or validation failure the previous task set and status
    /// are kept untouched. On success all bookkeeping is reset; if a run
    /// was active it is aborted first (the in-flight task, if any, is
    /// abandoned and its eventual settlement ignored).
    pub fn handle_import(&mut self, payload: &[u8]) -> (Result<usize>, CoreStep) {
        let tasks = match parse_task_set(payload).and_then(|set| {
            validate_task_set(&set)?;
            Ok(set)
        }) {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "task import rejected, keeping previous task set");
                return (Err(err), CoreStep::none());
            }
        };

        let mut step = CoreStep::none();
        if self.status.is_running {
            info!("import while running, aborting current run");
            step.push(CoreCommand::Emit(SchedulerEvent::ExecutionStopped));
        }

        let count = tasks.len();
        self.status = ExecutionStatus::for_pending(tasks.ids());
        self.tasks = tasks;
        info!(count, "task set imported");
        step.push(CoreCommand::Emit(SchedulerEvent::TasksImported {
            tasks: self.tasks.clone(),
        }));
        (Ok(count), step)
    }

    /// Begin a run. Idempotent while running; refused when the policy gate
    /// is closed or when no tasks are loaded.
    pub fn handle_start(&mut self, gate_allows: bool) -> CoreStep {
        if self.status.is_running {
            debug!("start requested while already running, ignoring");
            return CoreStep::none();
        }
        if !gate_allows {
            warn!("start refused by scheduling gate");
            return CoreStep::none();
        }
        if self.tasks.is_empty() {
            warn!("start requested with no tasks loaded");
            return CoreStep::none();
        }

        self.status.is_running = true;
        self.run_counter += 1;
        info!(run_id = self.run_counter, "execution started");
        let mut step = CoreStep::emit(SchedulerEvent::ExecutionStarted);
        step.commands.extend(self.advance().commands);
        step
    }

    /// Stop advancing. The in-flight task, if any, is not preempted; it is
    /// abandoned and its eventual settlement is ignored.
    pub fn handle_stop(&mut self) -> CoreStep {
        if !self.status.is_running {
            debug!("stop requested while idle, ignoring");
            return CoreStep::none();
        }
        if let Some(task_id) = self.status.current_task_id.take() {
            info!(%task_id, "stopping with a task still in flight");
        }
        self.status.is_running = false;
        info!("execution stopped");
        CoreStep::emit(SchedulerEvent::ExecutionStopped)
    }

    /// Record the outcome of the current task.
    ///
    /// Settlements for anything other than the task currently in flight
    /// are discarded: they are late arrivals from an aborted run or
    /// duplicate completion notifications.
    pub fn handle_task_settled(&mut self, task_id: TaskId, success: bool) -> CoreStep {
        if !self.status.is_running {
            debug!(%task_id, "settlement while idle, ignoring");
            return CoreStep::none();
        }
        if self.status.current_task_id.as_deref() != Some(task_id.as_str()) {
            debug!(%task_id, current = ?self.status.current_task_id, "settlement for a non-current task, ignoring");
            return CoreStep::none();
        }

        self.status.current_task_id = None;
        let mut step = CoreStep::none();
        if success {
            debug!(%task_id, "task completed");
            self.status.executed_tasks.push(task_id.clone());
            step.push(CoreCommand::Emit(SchedulerEvent::TaskCompleted { task_id }));
        } else {
            warn!(%task_id, "task failed");
            self.status.failed_tasks.push(task_id);
        }
        step.push(CoreCommand::ScheduleAdvance {
            run_id: self.run_counter,
        });
        step
    }

    /// React to a delayed advance tick. Stale ticks (from an earlier run,
    /// after a stop, or racing a concurrent dispatch) are discarded.
    pub fn handle_advance_due(&mut self, run_id: u64) -> CoreStep {
        if run_id != self.run_counter {
            debug!(run_id, current = self.run_counter, "stale advance tick, ignoring");
            return CoreStep::none();
        }
        if !self.status.is_running || self.status.current_task_id.is_some() {
            return CoreStep::none();
        }
        self.advance()
    }

    /// Pick and dispatch the next executable task, or finish the run when
    /// nothing is executable (all done, everything blocked on failed or
    /// cyclic dependencies).
    fn advance(&mut self) -> CoreStep {
        let Some(task_id) = select_next_executable(
            &self.status.pending_tasks,
            &self.status.executed_tasks,
            &self.tasks,
        ) else {
            if !self.status.pending_tasks.is_empty() {
                warn!(
                    blocked = self.status.pending_tasks.len(),
                    "no executable task left, remaining tasks are blocked"
                );
            }
            return self.finish_run();
        };

        self.status.pending_tasks.retain(|id| *id != task_id);
        let Some(task) = self.tasks.get(&task_id) else {
            // The resolver only returns ids present in the set.
            warn!(%task_id, "selected task vanished from the task set");
            return self.finish_run();
        };
        self.status.current_task_id = Some(task_id.clone());
        info!(%task_id, "dispatching task");
        CoreStep {
            commands: vec![CoreCommand::Dispatch(task.clone())],
        }
    }

    fn finish_run(&mut self) -> CoreStep {
        self.status.is_running = false;
        self.status.current_task_id = None;
        info!(
            executed = self.status.executed_tasks.len(),
            failed = self.status.failed_tasks.len(),
            blocked = self.status.pending_tasks.len(),
            "execution finished"
        );
        CoreStep::emit(SchedulerEvent::ExecutionStopped)
    }
}
