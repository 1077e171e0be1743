// src/exec/agent.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::exec::backend::DispatchBackend;
use crate::tasks::Task;

/// A prompt sent to an agent, tagged with the session it belongs to so
/// consecutive tasks share conversational context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub text: String,
    pub session_id: String,
}

/// The agent's reply. The text is currently only logged; the scheduler
/// cares about success or failure, not content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub text: String,
}

/// An agent that accepts prompts and eventually replies.
///
/// `send_prompt` resolves when the agent has finished working on the
/// prompt; an `Err` marks the task as failed.
pub trait AgentExecutor: Send + Sync + fmt::Debug {
    /// Stable session identifier attached to every prompt from this
    /// scheduler instance.
    fn session_id(&self) -> String;

    fn send_prompt(
        &self,
        request: PromptRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<PromptResponse>> + Send + '_>>;
}

/// Self-driven dispatch: send the prompt, await the reply, settle the task.
///
/// Each dispatch runs in its own spawned task so the runtime loop stays
/// free while the agent works. The outcome is reported back as a
/// `TaskSettled` event; if the runtime is already gone the report is
/// silently dropped.
pub struct AgentBackend {
    agent: Arc<dyn AgentExecutor>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl AgentBackend {
    pub fn new(agent: Arc<dyn AgentExecutor>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { agent, runtime_tx }
    }
}

impl fmt::Debug for AgentBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentBackend")
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

impl DispatchBackend for AgentBackend {
    fn dispatch(&mut self, task: Task) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let agent = Arc::clone(&self.agent);
        let tx = self.runtime_tx.clone();
        Box::pin(async move {
            tokio::spawn(run_task(agent, tx, task));
            Ok(())
        })
    }
}

async fn run_task(agent: Arc<dyn AgentExecutor>, tx: mpsc::Sender<RuntimeEvent>, task: Task) {
    let request = PromptRequest {
        text: task.prompt.clone(),
        session_id: agent.session_id(),
    };

    let reply = agent.send_prompt(request);
    let outcome = match task.timeout_ms {
        Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), reply).await {
            Ok(result) => result,
            Err(_) => {
                warn!(task_id = %task.id, timeout_ms = ms, "agent call timed out");
                let _ = tx
                    .send(RuntimeEvent::TaskSettled {
                        task_id: task.id,
                        success: false,
                    })
                    .await;
                return;
            }
        },
        None => reply.await,
    };

    let success = match outcome {
        Ok(response) => {
            debug!(task_id = %task.id, response_len = response.text.len(), "agent replied");
            true
        }
        Err(err) => {
            warn!(task_id = %task.id, error = %err, "agent call failed");
            false
        }
    };
    let _ = tx
        .send(RuntimeEvent::TaskSettled {
            task_id: task.id,
            success,
        })
        .await;
}
