//! Orchestration services for the task worklist.

mod lifecycle;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
