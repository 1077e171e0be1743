// src/exec/mod.rs

//! Dispatch backends.
//!
//! The runtime is generic over [`DispatchBackend`]: what "hand this task to
//! an executor" means. Two strategies exist:
//!
//! - [`AgentBackend`]: self-driven. The scheduler sends the task's prompt to
//!   an [`AgentExecutor`], awaits the reply, and settles the task itself.
//! - [`ExternalBackend`]: externally-driven. The scheduler only announces
//!   readiness on the event stream; an outside component performs the work
//!   and reports back via the handle's completion notification.

pub mod agent;
pub mod backend;
pub mod command;
pub mod external;

pub use agent::{AgentBackend, AgentExecutor, PromptRequest, PromptResponse};
pub use backend::DispatchBackend;
pub use command::CommandAgent;
pub use external::ExternalBackend;
