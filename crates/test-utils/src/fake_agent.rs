use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use promptdag::exec::{AgentExecutor, PromptRequest, PromptResponse};

/// A fake agent that:
/// - records every prompt it receives, in order
/// - succeeds immediately, unless the prompt contains a configured marker.
#[derive(Default)]
pub struct ScriptedAgent {
    prompts: Arc<Mutex<Vec<String>>>,
    fail_marker: Option<String>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any prompt whose text contains `marker`.
    pub fn fail_when_contains(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Shared handle to the recorded prompts.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl fmt::Debug for ScriptedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedAgent")
            .field("fail_marker", &self.fail_marker)
            .finish_non_exhaustive()
    }
}

impl AgentExecutor for ScriptedAgent {
    fn session_id(&self) -> String {
        "test-session".to_string()
    }

    fn send_prompt(
        &self,
        request: PromptRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<PromptResponse>> + Send + '_>> {
        let prompts = Arc::clone(&self.prompts);
        let fail_marker = self.fail_marker.clone();
        Box::pin(async move {
            prompts.lock().unwrap().push(request.text.clone());
            if let Some(marker) = fail_marker {
                if request.text.contains(&marker) {
                    anyhow::bail!("scripted failure for prompt containing '{marker}'");
                }
            }
            Ok(PromptResponse {
                text: format!("ok: {}", request.text),
            })
        })
    }
}

/// An agent that never replies; used to exercise per-task timeouts.
#[derive(Debug, Default)]
pub struct StalledAgent;

impl AgentExecutor for StalledAgent {
    fn session_id(&self) -> String {
        "stalled-session".to_string()
    }

    fn send_prompt(
        &self,
        _request: PromptRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<PromptResponse>> + Send + '_>> {
        Box::pin(async {
            std::future::pending::<()>().await;
            unreachable!()
        })
    }
}
