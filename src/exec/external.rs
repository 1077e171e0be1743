// src/exec/external.rs

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::errors::Result;
use crate::events::{EventStream, SchedulerEvent};
use crate::exec::backend::DispatchBackend;
use crate::tasks::Task;

/// Externally-driven dispatch: announce readiness, do nothing else.
///
/// The consumer subscribed to the event stream performs the work and calls
/// [`TaskScheduler::notify_task_completed`] when done; until then the task
/// stays in flight.
///
/// [`TaskScheduler::notify_task_completed`]: crate::engine::TaskScheduler::notify_task_completed
#[derive(Debug, Clone)]
pub struct ExternalBackend {
    stream: EventStream,
}

impl ExternalBackend {
    pub fn new(stream: EventStream) -> Self {
        Self { stream }
    }
}

impl DispatchBackend for ExternalBackend {
    fn dispatch(&mut self, task: Task) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(task_id = %task.id, "task ready for external executor");
            self.stream.emit(SchedulerEvent::TaskReady { task });
            Ok(())
        })
    }
}
