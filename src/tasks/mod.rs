// src/tasks/mod.rs

//! Task definitions: data model, loading and import-time validation.
//!
//! Responsibilities:
//! - Define the JSON-backed data model (`model.rs`).
//! - Read a raw payload from a pluggable source and parse it (`loader.rs`).
//! - Validate basic invariants like id uniqueness (`validate.rs`).
//!
//! Deliberately *not* validated here: dependency cycles and references to
//! unknown task ids. Those import fine and surface at runtime as a run that
//! terminates with tasks still pending.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{parse_task_set, FileTaskSource, TaskSource};
pub use model::{Task, TaskId, TaskSet};
pub use validate::validate_task_set;
