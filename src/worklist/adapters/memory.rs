//! In-memory client task repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::assignment::domain::ClientLoanTypeId;
use crate::worklist::{
    domain::{ClientTask, ClientTaskId, ClientTaskStatus},
    ports::{ClientTaskRepository, ClientTaskRepositoryError, ClientTaskRepositoryResult},
};
use crate::workspace::domain::WorkspaceId;

/// Thread-safe in-memory client task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientTaskRepository {
    state: Arc<RwLock<InMemoryWorklistState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorklistState {
    tasks: HashMap<ClientTaskId, ClientTask>,
    by_assignment: HashMap<ClientLoanTypeId, Vec<ClientTaskId>>,
}

impl InMemoryClientTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> ClientTaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryWorklistState>> {
        self.state.read().map_err(|err| {
            ClientTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> ClientTaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryWorklistState>> {
        self.state.write().map_err(|err| {
            ClientTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ClientTaskRepository for InMemoryClientTaskRepository {
    async fn store_batch(&self, tasks: &[ClientTask]) -> ClientTaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        // Validate the whole batch before touching the store so a collision
        // midway through never leaves a partial worklist behind.
        for task in tasks {
            if state.tasks.contains_key(&task.id()) {
                return Err(ClientTaskRepositoryError::DuplicateTask(task.id()));
            }
        }
        for task in tasks {
            state
                .by_assignment
                .entry(task.client_loan_type_id())
                .or_default()
                .push(task.id());
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn update(&self, task: &ClientTask) -> ClientTaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(ClientTaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClientTaskId) -> ClientTaskRepositoryResult<Option<ClientTask>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_client_loan_type(
        &self,
        client_loan_type_id: ClientLoanTypeId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        let state = self.read_state()?;
        Ok(state
            .by_assignment
            .get(&client_loan_type_id)
            .map(|task_ids| {
                task_ids
                    .iter()
                    .filter_map(|task_id| state.tasks.get(task_id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn list_by_status(
        &self,
        workspace_id: WorkspaceId,
        status: ClientTaskStatus,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.workspace_id() == workspace_id && task.status() == status)
            .cloned()
            .collect())
    }
}
