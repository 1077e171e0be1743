// src/exec/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::agent::{AgentExecutor, PromptRequest, PromptResponse};

/// Shell-command agent: one process per prompt.
///
/// The prompt is written to the child's stdin, the child's stdout is the
/// reply. A non-zero exit status fails the prompt. This is the default
/// agent wired up by the CLI; library users supply their own
/// [`AgentExecutor`] for anything richer.
#[derive(Debug, Clone)]
pub struct CommandAgent {
    cmd: String,
    session_id: String,
}

impl CommandAgent {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            session_id: format!("promptdag-{}", std::process::id()),
        }
    }
}

impl AgentExecutor for CommandAgent {
    fn session_id(&self) -> String {
        self.session_id.clone()
    }

    fn send_prompt(
        &self,
        request: PromptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PromptResponse>> + Send + '_>> {
        Box::pin(run_prompt(self.cmd.clone(), request))
    }
}

async fn run_prompt(cmd: String, request: PromptRequest) -> Result<PromptResponse> {
    info!(cmd = %cmd, session_id = %request.session_id, "starting agent process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&cmd);
        c
    };

    command
        .env("PROMPTDAG_SESSION_ID", &request.session_id)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning agent process '{cmd}'"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(request.text.as_bytes())
            .await
            .context("writing prompt to agent stdin")?;
        // Dropping stdin closes the pipe so the child sees EOF.
    }

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("agent stderr: {}", line);
            }
        });
    }

    let mut text = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        stdout
            .read_to_string(&mut text)
            .await
            .context("reading agent stdout")?;
    }

    let status = child.wait().await.context("waiting for agent process")?;
    let code = status.code().unwrap_or(-1);
    info!(exit_code = code, reply_len = text.len(), "agent process exited");

    if !status.success() {
        bail!("agent process exited with status {code}");
    }
    Ok(PromptResponse { text })
}
