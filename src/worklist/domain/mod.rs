//! Domain model for materialized client tasks.

mod client_task;
mod error;
mod ids;

pub use client_task::{ClientTask, ClientTaskStatus, PersistedClientTaskData, TaskSnapshot};
pub use error::{ParseClientTaskStatusError, WorklistDomainError};
pub use ids::ClientTaskId;
