// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::events::EventStream;
use crate::exec::DispatchBackend;
use crate::gate::SchedulingGate;
use crate::tasks::TaskSource;

use super::core::{CoreCommand, CoreStep, SchedulerCore};
use super::{RuntimeEvent, RuntimeOptions};

/// Drives the scheduler in response to `RuntimeEvent`s.
///
/// This is an IO shell around [`SchedulerCore`], which contains all the
/// scheduling semantics. The shell reads bytes from the task source, feeds
/// events into the core one at a time, and executes the commands the core
/// returns: dispatching through the backend, emitting on the event stream,
/// and arming delayed advance ticks. Because every mutation funnels through
/// this single loop, concurrent handle calls can never observe or produce
/// a torn state.
pub struct Runtime<D: DispatchBackend> {
    core: SchedulerCore,
    source: Box<dyn TaskSource>,
    gate: Box<dyn SchedulingGate>,
    options: RuntimeOptions,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    event_tx: mpsc::Sender<RuntimeEvent>,
    stream: EventStream,
    dispatcher: D,
}

impl<D: DispatchBackend> fmt::Debug for Runtime<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<D: DispatchBackend> Runtime<D> {
    pub fn new(
        source: Box<dyn TaskSource>,
        gate: Box<dyn SchedulingGate>,
        options: RuntimeOptions,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        event_tx: mpsc::Sender<RuntimeEvent>,
        stream: EventStream,
        dispatcher: D,
    ) -> Self {
        Self {
            core: SchedulerCore::new(),
            source,
            gate,
            options,
            event_rx,
            event_tx,
            stream,
            dispatcher,
        }
    }

    /// Main event loop. Exits when a shutdown is requested or every handle
    /// has been dropped.
    pub async fn run(mut self) -> Result<()> {
        info!("scheduler runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(event) => event,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            if !self.handle_event(event).await? {
                break;
            }
        }

        info!("scheduler runtime exiting");
        Ok(())
    }

    /// Feed one event into the core and execute the resulting commands.
    /// Returns `false` when the loop should exit.
    async fn handle_event(&mut self, event: RuntimeEvent) -> Result<bool> {
        let step = match event {
            RuntimeEvent::ImportRequested { reply } => {
                let (result, step) = match self.source.read() {
                    Ok(payload) => self.core.handle_import(&payload),
                    Err(err) => (Err(err), CoreStep::none()),
                };
                let _ = reply.send(result);
                step
            }
            RuntimeEvent::StartRequested => self.core.handle_start(self.gate.allows_start()),
            RuntimeEvent::StopRequested => self.core.handle_stop(),
            RuntimeEvent::StatusRequested { reply } => {
                let _ = reply.send(self.core.status());
                CoreStep::none()
            }
            RuntimeEvent::TaskSettled { task_id, success } => {
                self.core.handle_task_settled(task_id, success)
            }
            RuntimeEvent::AdvanceDue { run_id } => self.core.handle_advance_due(run_id),
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                return Ok(false);
            }
        };

        for command in step.commands {
            self.execute_command(command).await?;
        }
        Ok(true)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::Dispatch(task) => {
                debug!(task_id = %task.id, "dispatching through backend");
                self.dispatcher.dispatch(task).await?;
            }
            CoreCommand::Emit(event) => {
                self.stream.emit(event);
            }
            CoreCommand::ScheduleAdvance { run_id } => {
                self.schedule_advance(run_id);
            }
        }
        Ok(())
    }

    /// Arm a delayed `AdvanceDue` tick. Runs on its own task so the event
    /// loop stays responsive during the pause; the core discards the tick
    /// if the run it belongs to is no longer current.
    fn schedule_advance(&self, run_id: u64) {
        let tx = self.event_tx.clone();
        let delay = self.options.advance_delay;
        tokio::spawn(async move {
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(RuntimeEvent::AdvanceDue { run_id }).await;
        });
    }
}
