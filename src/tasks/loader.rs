// src/tasks/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SchedulerError};
use crate::tasks::model::{Task, TaskSet};

/// Abstract byte-readable task source.
///
/// The scheduler does not know where task definitions live; a collaborator
/// hands it raw bytes. Production code uses [`FileTaskSource`]; tests can
/// provide an in-memory implementation.
pub trait TaskSource: Send + Sync + std::fmt::Debug {
    /// Read the raw task-definition payload.
    fn read(&self) -> Result<Vec<u8>>;
}

/// Task source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileTaskSource {
    path: PathBuf,
}

impl FileTaskSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for FileTaskSource {
    fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Parse a raw payload into a [`TaskSet`].
///
/// Two-stage check:
/// 1. The payload must be valid JSON whose top level is an array; any other
///    top-level shape is rejected with [`SchedulerError::InvalidFormat`].
/// 2. Every element must deserialize as a [`Task`] record.
///
/// This only parses; it does **not** validate id uniqueness. Use
/// [`validate_task_set`](crate::tasks::validate_task_set) for that.
pub fn parse_task_set(payload: &[u8]) -> Result<TaskSet> {
    let value: Value = serde_json::from_slice(payload)?;

    let Value::Array(records) = value else {
        return Err(SchedulerError::InvalidFormat);
    };

    let tasks = records
        .into_iter()
        .map(serde_json::from_value::<Task>)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(TaskSet::new(tasks))
}
