// src/engine/handle.rs

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::error;

use crate::errors::{Result, SchedulerError};
use crate::events::{EventStream, SchedulerEvent};
use crate::exec::{AgentBackend, AgentExecutor, DispatchBackend, ExternalBackend};
use crate::gate::SchedulingGate;
use crate::sched::ExecutionStatus;
use crate::tasks::{TaskId, TaskSource};

use super::runtime::Runtime;
use super::{RuntimeEvent, RuntimeOptions};

/// Cloneable handle to a running scheduler.
///
/// All methods forward to the runtime's event loop; calls from any number
/// of clones are serialized there. Every async method returns
/// [`SchedulerError::RuntimeGone`] once the runtime has exited.
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    tx: mpsc::Sender<RuntimeEvent>,
    stream: EventStream,
}

impl TaskScheduler {
    /// Spawn a scheduler that drives an agent itself: each dispatched
    /// task's prompt is sent to `agent` and awaited, and the outcome
    /// settles the task.
    pub fn spawn_awaited(
        source: Box<dyn TaskSource>,
        agent: Arc<dyn AgentExecutor>,
        gate: Box<dyn SchedulingGate>,
        options: RuntimeOptions,
    ) -> Self {
        Self::spawn_with_backend(source, gate, options, |tx, _stream| {
            AgentBackend::new(agent, tx)
        })
    }

    /// Spawn a scheduler that only announces readiness: dispatch emits
    /// [`SchedulerEvent::TaskReady`] and an external component reports
    /// completion via [`TaskScheduler::notify_task_completed`].
    pub fn spawn_notified(
        source: Box<dyn TaskSource>,
        gate: Box<dyn SchedulingGate>,
        options: RuntimeOptions,
    ) -> Self {
        Self::spawn_with_backend(source, gate, options, |_tx, stream| {
            ExternalBackend::new(stream)
        })
    }

    /// Spawn a scheduler with a custom dispatch backend.
    pub fn spawn_with_backend<D, F>(
        source: Box<dyn TaskSource>,
        gate: Box<dyn SchedulingGate>,
        options: RuntimeOptions,
        make_backend: F,
    ) -> Self
    where
        D: DispatchBackend + 'static,
        F: FnOnce(mpsc::Sender<RuntimeEvent>, EventStream) -> D,
    {
        let (tx, rx) = mpsc::channel(64);
        let stream = EventStream::default();
        let dispatcher = make_backend(tx.clone(), stream.clone());
        let runtime = Runtime::new(source, gate, options, rx, tx.clone(), stream.clone(), dispatcher);
        tokio::spawn(async move {
            if let Err(err) = runtime.run().await {
                error!(error = %err, "scheduler runtime failed");
            }
        });
        Self { tx, stream }
    }

    /// Re-read the task source and replace the task set. Returns the
    /// number of imported tasks. On failure the previous task set stays
    /// in effect.
    pub async fn import_tasks(&self) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeEvent::ImportRequested { reply }).await?;
        rx.await.map_err(|_| SchedulerError::RuntimeGone)?
    }

    /// Begin executing the imported tasks. A no-op when already running.
    pub async fn start(&self) -> Result<()> {
        self.send(RuntimeEvent::StartRequested).await
    }

    /// Stop advancing to further tasks. The in-flight task, if any, is not
    /// preempted.
    pub async fn stop(&self) -> Result<()> {
        self.send(RuntimeEvent::StopRequested).await
    }

    /// Report the outcome of an externally executed task. Notifications
    /// for tasks that are not currently in flight are ignored.
    pub async fn notify_task_completed(&self, task_id: TaskId, success: bool) -> Result<()> {
        self.send(RuntimeEvent::TaskSettled { task_id, success })
            .await
    }

    /// Snapshot the current execution status.
    pub async fn status(&self) -> Result<ExecutionStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeEvent::StatusRequested { reply }).await?;
        rx.await.map_err(|_| SchedulerError::RuntimeGone)
    }

    /// Tear the runtime down. Outstanding handles keep failing with
    /// [`SchedulerError::RuntimeGone`] afterwards.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(RuntimeEvent::ShutdownRequested).await
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.stream.subscribe()
    }

    async fn send(&self, event: RuntimeEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| SchedulerError::RuntimeGone)
    }
}
