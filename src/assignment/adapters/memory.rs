//! In-memory assignment repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::assignment::{
    domain::{ClientLoanType, ClientLoanTypeId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::catalog::domain::LoanTypeId;
use crate::workspace::domain::{ClientId, WorkspaceId};

/// Thread-safe in-memory assignment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    state: Arc<RwLock<InMemoryAssignmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAssignmentState {
    assignments: HashMap<ClientLoanTypeId, ClientLoanType>,
    // Secondary index enforcing one active assignment per pair.
    active_pairs: HashMap<(ClientId, LoanTypeId), ClientLoanTypeId>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> AssignmentRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryAssignmentState>> {
        self.state.read().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> AssignmentRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryAssignmentState>> {
        self.state.write().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

const fn pair_key(assignment: &ClientLoanType) -> (ClientId, LoanTypeId) {
    (assignment.client_id(), assignment.loan_type_id())
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn store(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.assignments.contains_key(&assignment.id()) {
            return Err(AssignmentRepositoryError::DuplicateAssignment(
                assignment.id(),
            ));
        }
        let key = pair_key(assignment);
        if assignment.is_active() && state.active_pairs.contains_key(&key) {
            return Err(AssignmentRepositoryError::DuplicateActiveAssignment {
                client_id: assignment.client_id(),
                loan_type_id: assignment.loan_type_id(),
            });
        }
        if assignment.is_active() {
            state.active_pairs.insert(key, assignment.id());
        }
        state.assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn update(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.assignments.contains_key(&assignment.id()) {
            return Err(AssignmentRepositoryError::NotFound(assignment.id()));
        }
        let key = pair_key(assignment);
        if assignment.is_active() {
            let other_active = state
                .active_pairs
                .get(&key)
                .is_some_and(|owner| *owner != assignment.id());
            if other_active {
                return Err(AssignmentRepositoryError::DuplicateActiveAssignment {
                    client_id: assignment.client_id(),
                    loan_type_id: assignment.loan_type_id(),
                });
            }
            state.active_pairs.insert(key, assignment.id());
        } else if state
            .active_pairs
            .get(&key)
            .is_some_and(|owner| *owner == assignment.id())
        {
            state.active_pairs.remove(&key);
        }
        state.assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn remove(&self, id: ClientLoanTypeId) -> AssignmentRepositoryResult<()> {
        let mut state = self.write_state()?;
        let removed = state
            .assignments
            .remove(&id)
            .ok_or(AssignmentRepositoryError::NotFound(id))?;
        let key = pair_key(&removed);
        if state.active_pairs.get(&key).is_some_and(|owner| *owner == id) {
            state.active_pairs.remove(&key);
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ClientLoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>> {
        let state = self.read_state()?;
        Ok(state.assignments.get(&id).cloned())
    }

    async fn find_active(
        &self,
        client_id: ClientId,
        loan_type_id: LoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>> {
        let state = self.read_state()?;
        Ok(state
            .active_pairs
            .get(&(client_id, loan_type_id))
            .and_then(|id| state.assignments.get(id))
            .cloned())
    }

    async fn list_by_client(
        &self,
        client_id: ClientId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>> {
        let state = self.read_state()?;
        Ok(state
            .assignments
            .values()
            .filter(|assignment| assignment.client_id() == client_id)
            .cloned()
            .collect())
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>> {
        let state = self.read_state()?;
        Ok(state
            .assignments
            .values()
            .filter(|assignment| assignment.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }
}
