// src/exec/backend.rs

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::tasks::Task;

/// Strategy for getting a dispatched task executed.
///
/// `dispatch` must return quickly: long-running work (awaiting an agent
/// reply, waiting for an external component) happens in a spawned task or
/// outside the process entirely, and flows back into the runtime as a
/// settlement event. Blocking here would stall the event loop, making
/// status queries and `stop()` unresponsive while a task runs.
pub trait DispatchBackend: Send {
    fn dispatch(&mut self, task: Task) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
