// tests/prop_core.rs

use std::collections::HashSet;

use proptest::prelude::*;

use promptdag::engine::{CoreCommand, SchedulerCore};
use promptdag::tasks::Task;
use promptdag_test_utils::builders::{task_set_payload, TaskBuilder};

/// Generate an arbitrary task set of up to `max_tasks` tasks with random
/// dependency edges, including possible cycles and self-references.
fn task_set_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(0..num_tasks, 0..num_tasks),
            num_tasks,
        )
        .prop_map(move |raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    let mut builder = TaskBuilder::new(&format!("task_{i}"));
                    let unique: HashSet<usize> = deps.into_iter().collect();
                    for dep in unique {
                        builder = builder.depends_on(&format!("task_{dep}"));
                    }
                    builder.build()
                })
                .collect()
        })
    })
}

/// Drive a full run synchronously: dispatch commands are answered with a
/// settlement (success or failure per `failing`), advance ticks are fed
/// straight back in. Returns the dispatch order.
fn simulate_run(core: &mut SchedulerCore, failing: &HashSet<String>) -> Vec<String> {
    let mut dispatched = Vec::new();
    let mut queue = core.handle_start(true).commands;
    let mut steps = 0;

    while let Some(command) = queue.pop() {
        steps += 1;
        assert!(steps < 10_000, "simulation did not terminate");
        match command {
            CoreCommand::Dispatch(task) => {
                dispatched.push(task.id.clone());
                let success = !failing.contains(&task.id);
                queue.extend(core.handle_task_settled(task.id, success).commands);
            }
            CoreCommand::ScheduleAdvance { run_id } => {
                queue.extend(core.handle_advance_due(run_id).commands);
            }
            CoreCommand::Emit(_) => {}
        }
    }
    dispatched
}

proptest! {
    /// A run over N tasks performs at most N dispatches and always reaches
    /// idle, whatever the dependency structure.
    #[test]
    fn every_run_terminates_within_n_dispatches(
        tasks in task_set_strategy(8),
        failing_indices in proptest::collection::vec(0..8usize, 0..4),
    ) {
        let n = tasks.len();
        let failing: HashSet<String> = failing_indices
            .into_iter()
            .filter(|&i| i < n)
            .map(|i| format!("task_{i}"))
            .collect();

        let mut core = SchedulerCore::new();
        core.handle_import(&task_set_payload(&tasks)).0.unwrap();
        let dispatched = simulate_run(&mut core, &failing);

        prop_assert!(dispatched.len() <= n);
        prop_assert!(!core.status().is_running);
    }

    /// Every task id ends up in exactly one of executed, failed, or
    /// pending, and no id is dispatched twice.
    #[test]
    fn buckets_partition_the_task_set(
        tasks in task_set_strategy(8),
        failing_indices in proptest::collection::vec(0..8usize, 0..4),
    ) {
        let n = tasks.len();
        let failing: HashSet<String> = failing_indices
            .into_iter()
            .filter(|&i| i < n)
            .map(|i| format!("task_{i}"))
            .collect();

        let mut core = SchedulerCore::new();
        core.handle_import(&task_set_payload(&tasks)).0.unwrap();
        let dispatched = simulate_run(&mut core, &failing);

        let unique: HashSet<&String> = dispatched.iter().collect();
        prop_assert_eq!(unique.len(), dispatched.len(), "a task was dispatched twice");

        let status = core.status();
        let mut all = Vec::new();
        all.extend(status.executed_tasks.iter().cloned());
        all.extend(status.failed_tasks.iter().cloned());
        all.extend(status.pending_tasks.iter().cloned());
        all.sort();
        let mut expected: Vec<String> = (0..n).map(|i| format!("task_{i}")).collect();
        expected.sort();
        prop_assert_eq!(all, expected);
    }

    /// Dependencies are respected: at the moment a task is dispatched,
    /// every dependency has already been dispatched and succeeded.
    #[test]
    fn dependencies_execute_before_dependents(
        tasks in task_set_strategy(8),
    ) {
        let mut core = SchedulerCore::new();
        core.handle_import(&task_set_payload(&tasks)).0.unwrap();
        let dispatched = simulate_run(&mut core, &HashSet::new());

        for (pos, id) in dispatched.iter().enumerate() {
            let task = tasks.iter().find(|t| &t.id == id).unwrap();
            for dep in &task.depends_on {
                let dep_pos = dispatched.iter().position(|d| d == dep);
                prop_assert!(
                    matches!(dep_pos, Some(p) if p < pos),
                    "{} dispatched before its dependency {}", id, dep
                );
            }
        }
    }
}
