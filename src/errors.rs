// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Only import-time failures surface to callers; everything that happens
//! during a run (task faults, scheduling deadlock, a denied start) is
//! absorbed internally and observable through the execution status and the
//! event stream instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The task source could not be read.
    #[error("reading task source: {0}")]
    Io(#[from] std::io::Error),

    /// The payload parsed as JSON, but the top level is not an array.
    #[error("task payload must be a JSON array of task records")]
    InvalidFormat,

    /// The payload is not valid JSON, or a record is not task-shaped.
    #[error("malformed task payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The parsed task set violates an import-time invariant
    /// (duplicate or empty task ids).
    #[error("invalid task set: {0}")]
    InvalidTaskSet(String),

    /// The scheduler runtime loop has shut down; the handle is stale.
    #[error("scheduler runtime has shut down")]
    RuntimeGone,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
