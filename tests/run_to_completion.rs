// tests/run_to_completion.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use promptdag::engine::{RuntimeOptions, TaskScheduler};
use promptdag::events::SchedulerEvent;
use promptdag::gate::{AllowAll, SharedFlagGate};
use promptdag_test_utils::builders::{chain, task_set_payload, TaskBuilder};
use promptdag_test_utils::fake_agent::{ScriptedAgent, StalledAgent};
use promptdag_test_utils::sources::StaticTaskSource;
use promptdag_test_utils::{init_tracing, recv_until_stopped, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn test_options() -> RuntimeOptions {
    RuntimeOptions {
        advance_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn chain_executes_in_dependency_order() -> TestResult {
    init_tracing();

    let agent = ScriptedAgent::new();
    let prompts = agent.prompts();
    let source = StaticTaskSource::new(task_set_payload(&chain(&["a", "b", "c"])));
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(source),
        Arc::new(agent),
        Box::new(AllowAll),
        test_options(),
    );

    let mut events = scheduler.subscribe();
    assert_eq!(scheduler.import_tasks().await?, 3);
    scheduler.start().await?;

    let seen = recv_until_stopped(&mut events).await;
    let completed: Vec<_> = seen
        .iter()
        .filter_map(|e| match e {
            SchedulerEvent::TaskCompleted { task_id } => Some(task_id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec!["a", "b", "c"]);

    assert_eq!(
        prompts.lock().unwrap().clone(),
        vec!["prompt for a", "prompt for b", "prompt for c"]
    );

    let status = scheduler.status().await?;
    assert!(!status.is_running);
    assert_eq!(status.executed_tasks, vec!["a", "b", "c"]);
    assert!(status.pending_tasks.is_empty());
    assert!(status.failed_tasks.is_empty());

    scheduler.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn first_fit_picks_import_order_among_eligible() -> TestResult {
    init_tracing();

    // b and a are both immediately eligible; c depends on a. First-fit
    // means import order wins among eligible tasks.
    let tasks = vec![
        TaskBuilder::new("b").build(),
        TaskBuilder::new("a").build(),
        TaskBuilder::new("c").depends_on("a").build(),
    ];
    let agent = ScriptedAgent::new();
    let prompts = agent.prompts();
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(StaticTaskSource::new(task_set_payload(&tasks))),
        Arc::new(agent),
        Box::new(AllowAll),
        test_options(),
    );

    let mut events = scheduler.subscribe();
    scheduler.import_tasks().await?;
    scheduler.start().await?;
    recv_until_stopped(&mut events).await;

    assert_eq!(
        prompts.lock().unwrap().clone(),
        vec!["prompt for b", "prompt for a", "prompt for c"]
    );
    scheduler.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn status_is_queryable_while_a_task_is_in_flight() -> TestResult {
    init_tracing();

    // The stalled agent never settles, so "a" stays in flight while we
    // query status from the outside.
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(StaticTaskSource::new(task_set_payload(&chain(&["a", "b"])))),
        Arc::new(StalledAgent),
        Box::new(AllowAll),
        test_options(),
    );

    scheduler.import_tasks().await?;
    scheduler.start().await?;

    let status = with_timeout(scheduler.status()).await?;
    assert!(status.is_running);
    assert_eq!(status.current_task_id.as_deref(), Some("a"));
    assert_eq!(status.pending_tasks, vec!["b"]);

    scheduler.stop().await?;
    let status = with_timeout(scheduler.status()).await?;
    assert!(!status.is_running);
    assert_eq!(status.current_task_id, None);

    scheduler.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn closed_gate_blocks_start_until_reopened() -> TestResult {
    init_tracing();

    let gate = SharedFlagGate::new(false);
    let agent = ScriptedAgent::new();
    let prompts = agent.prompts();
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(StaticTaskSource::new(task_set_payload(&chain(&["a"])))),
        Arc::new(agent),
        Box::new(gate.clone()),
        test_options(),
    );

    let mut events = scheduler.subscribe();
    scheduler.import_tasks().await?;

    // Refused silently: no events, no dispatch, still idle.
    scheduler.start().await?;
    let status = scheduler.status().await?;
    assert!(!status.is_running);
    assert!(prompts.lock().unwrap().is_empty());

    gate.set_enabled(true);
    scheduler.start().await?;
    recv_until_stopped(&mut events).await;

    let status = scheduler.status().await?;
    assert_eq!(status.executed_tasks, vec!["a"]);

    scheduler.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn task_timeout_marks_task_failed() -> TestResult {
    init_tracing();

    let tasks = vec![TaskBuilder::new("slow").timeout_ms(50).build()];
    let scheduler = TaskScheduler::spawn_awaited(
        Box::new(StaticTaskSource::new(task_set_payload(&tasks))),
        Arc::new(StalledAgent),
        Box::new(AllowAll),
        test_options(),
    );

    let mut events = scheduler.subscribe();
    scheduler.import_tasks().await?;
    scheduler.start().await?;
    recv_until_stopped(&mut events).await;

    let status = scheduler.status().await?;
    assert_eq!(status.failed_tasks, vec!["slow"]);
    assert!(status.executed_tasks.is_empty());

    scheduler.shutdown().await?;
    Ok(())
}
