//! Repository port for client loan type assignment persistence.

use crate::assignment::domain::{ClientLoanType, ClientLoanTypeId};
use crate::catalog::domain::LoanTypeId;
use crate::workspace::domain::{ClientId, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment repository operations.
pub type AssignmentRepositoryResult<T> = Result<T, AssignmentRepositoryError>;

/// Assignment persistence contract.
///
/// The store enforces the core invariant that at most one *active*
/// assignment exists per (client, loan type) pair, so the invariant holds
/// even when two callers race past the service-level existence check.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Stores a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::DuplicateAssignment`] when the
    /// identifier already exists or
    /// [`AssignmentRepositoryError::DuplicateActiveAssignment`] when another
    /// active assignment exists for the same (client, loan type) pair.
    async fn store(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()>;

    /// Persists changes to an existing assignment (deactivation, notes).
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] when the assignment
    /// does not exist.
    async fn update(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()>;

    /// Removes an assignment outright.
    ///
    /// Used to roll back an assignment whose inline task materialization
    /// failed, keeping the operation all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] when the assignment
    /// does not exist.
    async fn remove(&self, id: ClientLoanTypeId) -> AssignmentRepositoryResult<()>;

    /// Finds an assignment by identifier.
    ///
    /// Returns `None` when the assignment does not exist.
    async fn find_by_id(
        &self,
        id: ClientLoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>>;

    /// Finds the active assignment for a (client, loan type) pair.
    ///
    /// Returns `None` when the pair has no active assignment; deactivated
    /// assignments are never returned.
    async fn find_active(
        &self,
        client_id: ClientId,
        loan_type_id: LoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>>;

    /// Returns all assignments for a client, active or not.
    async fn list_by_client(
        &self,
        client_id: ClientId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>>;

    /// Returns all assignments in a workspace.
    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>>;
}

/// Errors returned by assignment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentRepositoryError {
    /// An assignment with the same identifier already exists.
    #[error("duplicate assignment identifier: {0}")]
    DuplicateAssignment(ClientLoanTypeId),

    /// An active assignment already exists for the (client, loan type) pair.
    #[error("active assignment already exists for client {client_id} and loan type {loan_type_id}")]
    DuplicateActiveAssignment {
        /// The already-assigned client.
        client_id: ClientId,
        /// The already-assigned loan type.
        loan_type_id: LoanTypeId,
    },

    /// The assignment was not found.
    #[error("assignment not found: {0}")]
    NotFound(ClientLoanTypeId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
