// src/sched/mod.rs

//! Scheduling state and dependency resolution.
//!
//! - [`status`] holds the per-run execution status buckets.
//! - [`resolver`] decides which pending task (if any) is eligible next.

pub mod resolver;
pub mod status;

pub use resolver::select_next_executable;
pub use status::ExecutionStatus;
