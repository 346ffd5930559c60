//! Task lifecycle orchestration.

use crate::assignment::domain::ClientLoanTypeId;
use crate::worklist::{
    domain::{ClientTask, ClientTaskId, ClientTaskStatus, WorklistDomainError},
    ports::{ClientTaskRepository, ClientTaskRepositoryError},
};
use crate::workspace::domain::{UserId, WorkspaceId};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist in the requesting workspace.
    #[error("client task not found: {0}")]
    TaskNotFound(ClientTaskId),

    /// The state machine rejected the requested transition.
    #[error(transparent)]
    Domain(#[from] WorklistDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ClientTaskRepositoryError),
}

/// Result type for task lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Snapshot fields are immutable here by construction: the service only
/// touches status, completion, assignee, and client notes.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Transitions a task to a new lifecycle status.
    ///
    /// Entering `completed` stamps the completion timestamp; terminal
    /// states reject every further transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is missing
    /// or belongs to another workspace, and [`TaskLifecycleError::Domain`]
    /// when the state machine forbids the transition.
    pub async fn update_status(
        &self,
        workspace_id: WorkspaceId,
        task_id: ClientTaskId,
        target: ClientTaskStatus,
    ) -> TaskLifecycleResult<ClientTask> {
        let mut task = self.find_workspace_task(workspace_id, task_id).await?;
        task.transition_to(target, &*self.clock)?;
        self.repository.update(&task).await?;
        debug!(task = %task.id(), status = target.as_str(), "task status updated");
        Ok(task)
    }

    /// Routes a task to a user without changing its status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is missing
    /// or belongs to another workspace.
    pub async fn assign(
        &self,
        workspace_id: WorkspaceId,
        task_id: ClientTaskId,
        user_id: UserId,
    ) -> TaskLifecycleResult<ClientTask> {
        let mut task = self.find_workspace_task(workspace_id, task_id).await?;
        task.assign_to(user_id, &*self.clock);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Records free-text notes from the client on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is missing
    /// or belongs to another workspace.
    pub async fn record_client_notes(
        &self,
        workspace_id: WorkspaceId,
        task_id: ClientTaskId,
        notes: impl Into<String> + Send,
    ) -> TaskLifecycleResult<ClientTask> {
        let mut task = self.find_workspace_task(workspace_id, task_id).await?;
        task.record_client_notes(notes, &*self.clock);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Returns a task by identifier within a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is missing
    /// or belongs to another workspace.
    pub async fn get_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: ClientTaskId,
    ) -> TaskLifecycleResult<ClientTask> {
        self.find_workspace_task(workspace_id, task_id).await
    }

    /// Returns all tasks in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> TaskLifecycleResult<Vec<ClientTask>> {
        let mut tasks = self.repository.list_by_workspace(workspace_id).await?;
        sort_worklist(&mut tasks);
        Ok(tasks)
    }

    /// Returns an assignment's worklist sorted ascending by the copied
    /// sequence position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_by_client_loan_type(
        &self,
        client_loan_type_id: ClientLoanTypeId,
    ) -> TaskLifecycleResult<Vec<ClientTask>> {
        let mut tasks = self
            .repository
            .list_by_client_loan_type(client_loan_type_id)
            .await?;
        sort_worklist(&mut tasks);
        Ok(tasks)
    }

    /// Returns all tasks in a workspace with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_by_status(
        &self,
        workspace_id: WorkspaceId,
        status: ClientTaskStatus,
    ) -> TaskLifecycleResult<Vec<ClientTask>> {
        let mut tasks = self.repository.list_by_status(workspace_id, status).await?;
        sort_worklist(&mut tasks);
        Ok(tasks)
    }

    /// Returns the workspace's overdue tasks: non-terminal status with a due
    /// date before the current clock time.
    ///
    /// Overdue is computed here on read; it is never a stored status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_overdue(
        &self,
        workspace_id: WorkspaceId,
    ) -> TaskLifecycleResult<Vec<ClientTask>> {
        let now = self.clock.utc();
        let mut tasks = self.repository.list_by_workspace(workspace_id).await?;
        tasks.retain(|task| task.is_overdue(now));
        tasks.sort_by(|a, b| a.due_date().cmp(&b.due_date()));
        Ok(tasks)
    }

    async fn find_workspace_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: ClientTaskId,
    ) -> TaskLifecycleResult<ClientTask> {
        self.repository
            .find_by_id(task_id)
            .await?
            .filter(|task| task.workspace_id() == workspace_id)
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}

fn sort_worklist(tasks: &mut [ClientTask]) {
    tasks.sort_by(|a, b| {
        a.snapshot()
            .order
            .cmp(&b.snapshot().order)
            .then_with(|| a.created_at().cmp(&b.created_at()))
    });
}
