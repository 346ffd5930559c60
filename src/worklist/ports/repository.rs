//! Repository port for materialized client task persistence.

use crate::assignment::domain::ClientLoanTypeId;
use crate::worklist::domain::{ClientTask, ClientTaskId, ClientTaskStatus};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for client task repository operations.
pub type ClientTaskRepositoryResult<T> = Result<T, ClientTaskRepositoryError>;

/// Client task persistence contract.
#[async_trait]
pub trait ClientTaskRepository: Send + Sync {
    /// Stores a batch of freshly materialized tasks atomically.
    ///
    /// Either every task in the batch is persisted or none is; a partially
    /// materialized worklist is never observable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientTaskRepositoryError::DuplicateTask`] when any task in
    /// the batch collides with an existing identifier, leaving the store
    /// unchanged.
    async fn store_batch(&self, tasks: &[ClientTask]) -> ClientTaskRepositoryResult<()>;

    /// Persists lifecycle changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientTaskRepositoryError::NotFound`] when the task does
    /// not exist.
    async fn update(&self, task: &ClientTask) -> ClientTaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: ClientTaskId) -> ClientTaskRepositoryResult<Option<ClientTask>>;

    /// Returns all tasks materialized for one assignment.
    async fn list_by_client_loan_type(
        &self,
        client_loan_type_id: ClientLoanTypeId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>>;

    /// Returns all tasks in a workspace.
    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>>;

    /// Returns all tasks in a workspace with the given status.
    async fn list_by_status(
        &self,
        workspace_id: WorkspaceId,
        status: ClientTaskStatus,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>>;
}

/// Errors returned by client task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ClientTaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate client task identifier: {0}")]
    DuplicateTask(ClientTaskId),

    /// The task was not found.
    #[error("client task not found: {0}")]
    NotFound(ClientTaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ClientTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
