// src/events.rs

//! Lifecycle event stream.
//!
//! JSON-serializable events delivered over a broadcast channel. Subscribers
//! register explicitly via [`EventStream::subscribe`]; emission is
//! fire-and-forget and never blocks the scheduler. Within one scheduling
//! step, state mutation happens before the corresponding event is delivered.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::tasks::{Task, TaskId, TaskSet};

/// Events emitted by the scheduler for observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// A new task set replaced the previous one.
    TasksImported { tasks: TaskSet },
    /// A run started.
    ExecutionStarted,
    /// The run reached idle, either because all work settled or because no
    /// pending task was eligible.
    ExecutionStopped,
    /// A task completed successfully.
    TaskCompleted { task_id: TaskId },
    /// A task is ready for an external executor to pick up
    /// (externally-driven deployments only).
    TaskReady { task: Task },
}

/// Broadcast-based event stream for multiple consumers.
#[derive(Debug, Clone)]
pub struct EventStream {
    tx: broadcast::Sender<SchedulerEvent>,
}

impl EventStream {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    ///
    /// A send error only means there are no subscribers; that is fine.
    pub fn emit(&self, event: SchedulerEvent) {
        let _ = self.tx.send(event);
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization() {
        let event = SchedulerEvent::TaskCompleted {
            task_id: "summarise".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("task_completed"));
        assert!(json.contains("summarise"));
    }

    #[test]
    fn unit_variant_serialization() {
        let json = serde_json::to_string(&SchedulerEvent::ExecutionStarted).unwrap();
        assert!(json.contains("execution_started"));

        let parsed: SchedulerEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, SchedulerEvent::ExecutionStarted));
    }

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let stream = EventStream::new(8);
        let mut rx = stream.subscribe();

        stream.emit(SchedulerEvent::ExecutionStarted);
        stream.emit(SchedulerEvent::ExecutionStopped);

        assert!(matches!(
            rx.recv().await.unwrap(),
            SchedulerEvent::ExecutionStarted
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SchedulerEvent::ExecutionStopped
        ));
    }
}
