#![allow(dead_code)]

use promptdag::tasks::{Task, TaskSet};

/// Builder for `Task` to simplify test setup.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: Task {
                id: id.to_string(),
                prompt: format!("prompt for {id}"),
                description: None,
                depends_on: vec![],
                timeout_ms: None,
            },
        }
    }

    pub fn prompt(mut self, text: &str) -> Self {
        self.task.prompt = text.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.task.description = Some(text.to_string());
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.task.timeout_ms = Some(ms);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Serialize tasks into the JSON payload the loader expects.
pub fn task_set_payload(tasks: &[Task]) -> Vec<u8> {
    serde_json::to_vec(&TaskSet::new(tasks.to_vec()))
        .expect("task set should serialize")
}

/// Shorthand for a linear chain `ids[0] <- ids[1] <- ...`.
pub fn chain(ids: &[&str]) -> Vec<Task> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let mut builder = TaskBuilder::new(id);
            if i > 0 {
                builder = builder.depends_on(ids[i - 1]);
            }
            builder.build()
        })
        .collect()
}
