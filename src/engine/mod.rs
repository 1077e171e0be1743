// src/engine/mod.rs

//! Scheduling engine.
//!
//! This module ties together:
//! - the pure scheduler state machine ([`core`]) that owns the task set and
//!   execution status
//! - the async runtime shell ([`runtime`]) that serializes all access
//!   through a single event loop
//! - the cloneable public handle ([`handle`]) used to drive the scheduler
//!   from the outside
//!
//! The core never touches channels, Tokio types, or IO; everything that can
//! race goes through the runtime's mpsc queue, so a late completion
//! notification can never overlap a `stop()` or a subsequent `start()`.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::errors::Result;
use crate::sched::ExecutionStatus;
use crate::tasks::TaskId;

pub mod core;
pub mod handle;
pub mod runtime;

pub use self::core::{CoreCommand, CoreStep, SchedulerCore};
pub use handle::TaskScheduler;
pub use runtime::Runtime;

/// Events flowing into the scheduler runtime, from the public handle and
/// from dispatch backends.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// Re-read the task source and replace the task set.
    ImportRequested {
        reply: oneshot::Sender<Result<usize>>,
    },
    /// Begin a run (no-op when already running, gated by policy).
    StartRequested,
    /// Stop advancing (no-op when idle; in-flight work is not preempted).
    StopRequested,
    /// Snapshot the current execution status.
    StatusRequested {
        reply: oneshot::Sender<ExecutionStatus>,
    },
    /// The current task settled, either because the awaited agent call
    /// finished or because an external completion notification arrived.
    TaskSettled { task_id: TaskId, success: bool },
    /// Delayed advance tick scheduled after a task settled.
    AdvanceDue { run_id: u64 },
    /// Tear the runtime loop down.
    ShutdownRequested,
}

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Pause between a task settling and the next dispatch. A cooperative
    /// yield point, not a correctness requirement; status queries and
    /// `stop()` stay responsive during it.
    pub advance_delay: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(1000),
        }
    }
}
