//! Role-authorized, idempotent client assignment.

use super::materializer::{MaterializationError, TaskMaterializer};
use crate::assignment::{
    domain::{AssignmentDomainError, ClientLoanType, ClientLoanTypeId, NewClientLoanType},
    ports::{AssignmentRepository, AssignmentRepositoryError},
};
use crate::catalog::domain::LoanTypeId;
use crate::catalog::ports::{CatalogRepository, CatalogRepositoryError};
use crate::worklist::domain::ClientTask;
use crate::worklist::ports::ClientTaskRepository;
use crate::workspace::domain::{ClientId, Role, UserId, WorkspaceId};
use crate::workspace::ports::{MembershipDirectory, MembershipError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Request payload for assigning a loan type to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignLoanTypeRequest {
    workspace_id: WorkspaceId,
    client_id: ClientId,
    loan_type_id: LoanTypeId,
    assigned_by: UserId,
    custom_order: Option<i32>,
    notes: Option<String>,
}

impl AssignLoanTypeRequest {
    /// Creates a request with required assignment fields.
    #[must_use]
    pub const fn new(
        workspace_id: WorkspaceId,
        client_id: ClientId,
        loan_type_id: LoanTypeId,
        assigned_by: UserId,
    ) -> Self {
        Self {
            workspace_id,
            client_id,
            loan_type_id,
            assigned_by,
            custom_order: None,
            notes: None,
        }
    }

    /// Sets the client-facing display position.
    #[must_use]
    pub const fn with_custom_order(mut self, custom_order: i32) -> Self {
        self.custom_order = Some(custom_order);
        self
    }

    /// Sets free-text notes recorded at assignment time.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Result of an assignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// The active assignment, fresh or pre-existing.
    pub assignment: ClientLoanType,
    /// The assignment's materialized task worklist.
    pub tasks: Vec<ClientTask>,
    /// Whether this call created the assignment. `false` means an active
    /// assignment already existed and was returned unchanged.
    pub newly_assigned: bool,
}

/// Service-level errors for assignment operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// The acting user lacks a workflow-management role in the workspace.
    #[error("user {user_id} may not manage assignments in workspace {workspace_id}")]
    PermissionDenied {
        /// The acting user.
        user_id: UserId,
        /// The workspace the action targeted.
        workspace_id: WorkspaceId,
    },

    /// The target is not a client member of the workspace.
    #[error("client {client_id} is not a member of workspace {workspace_id}")]
    ClientNotInWorkspace {
        /// The target client.
        client_id: ClientId,
        /// The workspace the action targeted.
        workspace_id: WorkspaceId,
    },

    /// The loan type does not exist in the requesting workspace.
    #[error("loan type not found: {0}")]
    LoanTypeNotFound(LoanTypeId),

    /// The assignment does not exist in the requesting workspace.
    #[error("assignment not found: {0}")]
    AssignmentNotFound(ClientLoanTypeId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AssignmentDomainError),

    /// Membership lookup failed.
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Loan type lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogRepositoryError),

    /// Assignment persistence failed.
    #[error(transparent)]
    Repository(#[from] AssignmentRepositoryError),

    /// Task materialization failed and the assignment was rolled back.
    #[error(transparent)]
    Materialization(#[from] MaterializationError),
}

/// Result type for assignment service operations.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// Assignment orchestration service.
///
/// Assigning is idempotent per active (client, loan type) pair and
/// materializes the task worklist synchronously: the returned outcome always
/// carries the assignment's full worklist.
#[derive(Clone)]
pub struct AssignmentService<D, A, R, T, C>
where
    D: MembershipDirectory,
    A: AssignmentRepository,
    R: CatalogRepository,
    T: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    assignments: Arc<A>,
    catalog: Arc<R>,
    tasks: Arc<T>,
    materializer: TaskMaterializer<R, T, C>,
    clock: Arc<C>,
}

impl<D, A, R, T, C> AssignmentService<D, A, R, T, C>
where
    D: MembershipDirectory,
    A: AssignmentRepository,
    R: CatalogRepository,
    T: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new assignment service.
    #[must_use]
    pub fn new(
        directory: Arc<D>,
        assignments: Arc<A>,
        catalog: Arc<R>,
        tasks: Arc<T>,
        clock: Arc<C>,
    ) -> Self {
        let materializer =
            TaskMaterializer::new(Arc::clone(&catalog), Arc::clone(&tasks), Arc::clone(&clock));
        Self {
            directory,
            assignments,
            catalog,
            tasks,
            materializer,
            clock,
        }
    }

    /// Assigns a loan type to a client and materializes its task worklist.
    ///
    /// When the pair already has an active assignment the existing record is
    /// returned with its worklist, with `newly_assigned` set to `false`; a
    /// worklist left empty by an earlier failed materialization is
    /// materialized on the way. A fresh assignment materializes
    /// synchronously; if
    /// materialization fails the assignment row is removed again so the
    /// operation is all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::PermissionDenied`] when the caller lacks
    /// an advisor or staff role, [`AssignmentError::ClientNotInWorkspace`]
    /// when the target is not a client member of the workspace, and
    /// [`AssignmentError::LoanTypeNotFound`] when the loan type is missing
    /// or belongs to another workspace.
    pub async fn assign_loan_type_to_client(
        &self,
        request: AssignLoanTypeRequest,
    ) -> AssignmentResult<AssignmentOutcome> {
        self.require_workflow_role(request.workspace_id, request.assigned_by)
            .await?;

        let client_role = self
            .directory
            .role_of(request.workspace_id, request.client_id.into_user_id())
            .await?;
        if client_role != Some(Role::Client) {
            return Err(AssignmentError::ClientNotInWorkspace {
                client_id: request.client_id,
                workspace_id: request.workspace_id,
            });
        }

        let loan_type_in_workspace = self
            .catalog
            .find_loan_type(request.loan_type_id)
            .await?
            .is_some_and(|loan_type| loan_type.workspace_id() == request.workspace_id);
        if !loan_type_in_workspace {
            return Err(AssignmentError::LoanTypeNotFound(request.loan_type_id));
        }

        if let Some(existing) = self
            .assignments
            .find_active(request.client_id, request.loan_type_id)
            .await?
        {
            return self.existing_outcome(existing).await;
        }

        let assignment = ClientLoanType::new(
            NewClientLoanType {
                workspace_id: request.workspace_id,
                client_id: request.client_id,
                loan_type_id: request.loan_type_id,
                assigned_by: request.assigned_by,
                custom_order: request.custom_order,
                notes: request.notes,
            },
            &*self.clock,
        );

        match self.assignments.store(&assignment).await {
            Ok(()) => {}
            Err(AssignmentRepositoryError::DuplicateActiveAssignment { .. }) => {
                // Lost the race to a concurrent assignment of the same pair;
                // return the winner.
                let winner = self
                    .assignments
                    .find_active(request.client_id, request.loan_type_id)
                    .await?
                    .ok_or(AssignmentRepositoryError::DuplicateActiveAssignment {
                        client_id: request.client_id,
                        loan_type_id: request.loan_type_id,
                    })?;
                return self.existing_outcome(winner).await;
            }
            Err(err) => return Err(err.into()),
        }

        let tasks = match self.materializer.materialize_for_assignment(&assignment).await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    assignment = %assignment.id(),
                    "materialization failed, rolling back assignment"
                );
                if let Err(remove_err) = self.assignments.remove(assignment.id()).await {
                    // A repeat assign re-materializes the leftover worklist.
                    warn!(
                        assignment = %assignment.id(),
                        error = %remove_err,
                        "rollback failed, assignment left without a worklist"
                    );
                }
                return Err(err.into());
            }
        };

        debug!(
            assignment = %assignment.id(),
            client = %assignment.client_id(),
            loan_type = %assignment.loan_type_id(),
            tasks = tasks.len(),
            "loan type assigned"
        );
        Ok(AssignmentOutcome {
            assignment,
            tasks,
            newly_assigned: true,
        })
    }

    /// Deactivates an assignment, freeing its (client, loan type) pair for
    /// a future fresh assignment. Existing task snapshots are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::AssignmentNotFound`] when the assignment
    /// is missing or belongs to another workspace, and
    /// [`AssignmentError::Domain`] when it is already inactive.
    pub async fn deactivate_assignment(
        &self,
        workspace_id: WorkspaceId,
        assignment_id: ClientLoanTypeId,
        acted_by: UserId,
    ) -> AssignmentResult<ClientLoanType> {
        self.require_workflow_role(workspace_id, acted_by).await?;

        let mut assignment = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .filter(|found| found.workspace_id() == workspace_id)
            .ok_or(AssignmentError::AssignmentNotFound(assignment_id))?;
        assignment.deactivate(&*self.clock)?;
        self.assignments.update(&assignment).await?;
        debug!(assignment = %assignment.id(), "assignment deactivated");
        Ok(assignment)
    }

    /// Returns all of a client's assignments in a workspace, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] when the lookup fails.
    pub async fn assignments_for_client(
        &self,
        workspace_id: WorkspaceId,
        client_id: ClientId,
    ) -> AssignmentResult<Vec<ClientLoanType>> {
        let mut assignments = self.assignments.list_by_client(client_id).await?;
        assignments.retain(|assignment| assignment.workspace_id() == workspace_id);
        assignments.sort_by(|a, b| {
            a.custom_order()
                .cmp(&b.custom_order())
                .then_with(|| a.assigned_at().cmp(&b.assigned_at()))
        });
        Ok(assignments)
    }

    async fn existing_outcome(
        &self,
        assignment: ClientLoanType,
    ) -> AssignmentResult<AssignmentOutcome> {
        let mut tasks = self
            .tasks
            .list_by_client_loan_type(assignment.id())
            .await
            .map_err(MaterializationError::Tasks)?;
        if tasks.is_empty() {
            // Batch persistence is all-or-nothing, so an empty worklist
            // means an earlier materialization failed and its rollback did
            // too. Materialize now to heal the leftover.
            tasks = self
                .materializer
                .materialize_for_assignment(&assignment)
                .await?;
        }
        tasks.sort_by(|a, b| {
            a.snapshot()
                .order
                .cmp(&b.snapshot().order)
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        debug!(
            assignment = %assignment.id(),
            "active assignment already exists, returning it unchanged"
        );
        Ok(AssignmentOutcome {
            assignment,
            tasks,
            newly_assigned: false,
        })
    }

    async fn require_workflow_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> AssignmentResult<()> {
        let role = self.directory.role_of(workspace_id, user_id).await?;
        if role.is_some_and(Role::can_manage_workflows) {
            Ok(())
        } else {
            Err(AssignmentError::PermissionDenied {
                user_id,
                workspace_id,
            })
        }
    }
}
