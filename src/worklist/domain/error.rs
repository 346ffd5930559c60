//! Error types for worklist domain validation and parsing.

use super::{ClientTaskId, ClientTaskStatus};
use thiserror::Error;

/// Errors returned while mutating client task aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorklistDomainError {
    /// The requested status transition is not permitted by the state
    /// machine.
    #[error("invalid status transition for task {task_id}: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// The task whose transition was rejected.
        task_id: ClientTaskId,
        /// Current status.
        from: ClientTaskStatus,
        /// Requested status.
        to: ClientTaskStatus,
    },
}

/// Error returned while parsing client task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown client task status: {0}")]
pub struct ParseClientTaskStatusError(pub String);
