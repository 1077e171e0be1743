// src/lib.rs

pub mod cli;
pub mod engine;
pub mod errors;
pub mod events;
pub mod exec;
pub mod gate;
pub mod logging;
pub mod sched;
pub mod tasks;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::engine::{RuntimeOptions, TaskScheduler};
use crate::events::SchedulerEvent;
use crate::exec::CommandAgent;
use crate::gate::AllowAll;
use crate::tasks::{parse_task_set, validate_task_set, FileTaskSource, TaskSet};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the task file source
/// - the scheduler runtime with the shell-command agent backend
/// - Ctrl-C handling
/// - the event loop that waits for the run to finish
pub async fn run(args: CliArgs) -> Result<()> {
    if args.dry_run {
        let payload = std::fs::read(&args.tasks)?;
        let tasks = parse_task_set(&payload)?;
        validate_task_set(&tasks)?;
        print_dry_run(&tasks);
        return Ok(());
    }

    let source = FileTaskSource::new(&args.tasks);
    let agent_cmd = args
        .agent_cmd
        .ok_or_else(|| anyhow!("--agent-cmd is required unless --dry-run is given"))?;

    let options = RuntimeOptions {
        advance_delay: Duration::from_millis(args.delay_ms),
    };
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(source),
        Arc::new(CommandAgent::new(agent_cmd)),
        Box::new(AllowAll),
        options,
    );

    let mut events = scheduler.subscribe();

    let count = scheduler.import_tasks().await?;
    if count == 0 {
        info!("task file is empty, nothing to do");
        return Ok(());
    }

    // Ctrl-C → stop the run; the event loop below then sees
    // ExecutionStopped and exits normally.
    {
        let scheduler = scheduler.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("interrupt received, stopping");
            let _ = scheduler.stop().await;
        });
    }

    scheduler.start().await?;

    loop {
        match events.recv().await {
            Ok(SchedulerEvent::ExecutionStopped) => break,
            Ok(SchedulerEvent::TaskCompleted { task_id }) => {
                info!(%task_id, "completed");
            }
            Ok(event) => {
                debug!(?event, "scheduler event");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event stream lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    let status = scheduler.status().await?;
    println!(
        "promptdag finished: {} executed, {} failed, {} not run",
        status.executed_tasks.len(),
        status.failed_tasks.len(),
        status.pending_tasks.len()
    );
    scheduler.shutdown().await?;
    Ok(())
}

/// Simple dry-run output: print tasks in import order with their deps.
fn print_dry_run(tasks: &TaskSet) {
    println!("promptdag dry-run");
    println!("tasks ({}):", tasks.len());
    for task in tasks.iter() {
        println!("  - {}", task.id);
        if let Some(ref description) = task.description {
            println!("      description: {description}");
        }
        if !task.depends_on.is_empty() {
            println!("      dependsOn: {:?}", task.depends_on);
        }
        if let Some(timeout) = task.timeout_ms {
            println!("      timeout: {timeout}ms");
        }
    }

    debug!("dry-run complete (no execution)");
}
