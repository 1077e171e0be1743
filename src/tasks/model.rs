// src/tasks/model.rs

use serde::{Deserialize, Serialize};

/// Canonical task id type used throughout the crate.
pub type TaskId = String;

/// One prompt-driven unit of work, as read from the task definition file.
///
/// This is a direct mapping of the JSON records:
///
/// ```json
/// {
///   "id": "review",
///   "prompt": "Review the generated summary.",
///   "description": "Second pass",
///   "dependsOn": ["summarise"],
///   "timeout": 30000
/// }
/// ```
///
/// `id` and `prompt` are required; everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task id. Uniqueness is enforced at import time.
    pub id: TaskId,

    /// The prompt handed to the agent when this task is dispatched.
    pub prompt: String,

    /// Optional human-readable description; not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ids of tasks that must be executed before this one becomes eligible.
    ///
    /// Forward and backward references are both legal. References to ids
    /// that do not exist are not an import error; such a task simply never
    /// becomes eligible.
    #[serde(
        default,
        rename = "dependsOn",
        alias = "depends_on",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<TaskId>,

    /// Per-task timeout in milliseconds, enforced in self-driven dispatch
    /// only (there is no in-flight handle to bound in externally-driven
    /// deployments).
    #[serde(
        default,
        rename = "timeout",
        alias = "timeout_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_ms: Option<u64>,
}

/// Ordered collection of tasks, owned exclusively by the scheduler and
/// replaced wholesale on each import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Look up a task by id. With a validated set ids are unique, so
    /// "first match in import order" is unambiguous.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// All task ids in import order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl From<Vec<Task>> for TaskSet {
    fn from(tasks: Vec<Task>) -> Self {
        Self::new(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_deserializes_camel_case_fields() {
        let json = r#"{
            "id": "b",
            "prompt": "p2",
            "dependsOn": ["a"],
            "timeout": 5000
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "b");
        assert_eq!(task.depends_on, vec!["a".to_string()]);
        assert_eq!(task.timeout_ms, Some(5000));
        assert!(task.description.is_none());
    }

    #[test]
    fn optional_fields_default() {
        let task: Task = serde_json::from_str(r#"{"id": "a", "prompt": "p"}"#).unwrap();
        assert!(task.depends_on.is_empty());
        assert!(task.timeout_ms.is_none());
    }

    #[test]
    fn task_set_lookup_by_id() {
        let set = TaskSet::new(vec![
            Task {
                id: "a".into(),
                prompt: "p1".into(),
                description: None,
                depends_on: vec![],
                timeout_ms: None,
            },
            Task {
                id: "b".into(),
                prompt: "p2".into(),
                description: None,
                depends_on: vec!["a".into()],
                timeout_ms: None,
            },
        ]);

        assert_eq!(set.get("b").unwrap().prompt, "p2");
        assert!(set.get("missing").is_none());
        assert_eq!(set.ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
