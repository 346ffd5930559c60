//! Client loan type assignment aggregate root.

use super::{AssignmentDomainError, ClientLoanTypeId};
use crate::catalog::domain::LoanTypeId;
use crate::workspace::domain::{ClientId, UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The binding of one client to one loan type within a workspace.
///
/// Creation is the trigger for task materialization; the aggregate itself
/// only records who was assigned what, by whom, and whether the assignment
/// is still active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLoanType {
    id: ClientLoanTypeId,
    workspace_id: WorkspaceId,
    client_id: ClientId,
    loan_type_id: LoanTypeId,
    assigned_by: UserId,
    assigned_at: DateTime<Utc>,
    is_active: bool,
    custom_order: Option<i32>,
    notes: Option<String>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClientLoanType {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// The assigned client.
    pub client_id: ClientId,
    /// The assigned loan type.
    pub loan_type_id: LoanTypeId,
    /// The advisor or staff member who performed the assignment.
    pub assigned_by: UserId,
    /// Optional client-facing display position.
    pub custom_order: Option<i32>,
    /// Optional free-text notes recorded at assignment time.
    pub notes: Option<String>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedClientLoanTypeData {
    /// Persisted identifier.
    pub id: ClientLoanTypeId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// The assigned client.
    pub client_id: ClientId,
    /// The assigned loan type.
    pub loan_type_id: LoanTypeId,
    /// Who performed the assignment.
    pub assigned_by: UserId,
    /// When the assignment was made.
    pub assigned_at: DateTime<Utc>,
    /// Whether the assignment is still active.
    pub is_active: bool,
    /// Optional client-facing display position.
    pub custom_order: Option<i32>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ClientLoanType {
    /// Creates a new active assignment stamped with the current clock time.
    #[must_use]
    pub fn new(data: NewClientLoanType, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ClientLoanTypeId::new(),
            workspace_id: data.workspace_id,
            client_id: data.client_id,
            loan_type_id: data.loan_type_id,
            assigned_by: data.assigned_by,
            assigned_at: timestamp,
            is_active: true,
            custom_order: data.custom_order,
            notes: data.notes,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedClientLoanTypeData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            client_id: data.client_id,
            loan_type_id: data.loan_type_id,
            assigned_by: data.assigned_by,
            assigned_at: data.assigned_at,
            is_active: data.is_active,
            custom_order: data.custom_order,
            notes: data.notes,
            updated_at: data.updated_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> ClientLoanTypeId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the assigned client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the assigned loan type.
    #[must_use]
    pub const fn loan_type_id(&self) -> LoanTypeId {
        self.loan_type_id
    }

    /// Returns who performed the assignment.
    #[must_use]
    pub const fn assigned_by(&self) -> UserId {
        self.assigned_by
    }

    /// Returns when the assignment was made.
    ///
    /// Task due dates are computed from this instant.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns whether the assignment is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the client-facing display position, if any.
    #[must_use]
    pub const fn custom_order(&self) -> Option<i32> {
        self.custom_order
    }

    /// Returns the assignment notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Deactivates the assignment, freeing the (client, loan type) pair for
    /// a future fresh assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentDomainError::AlreadyInactive`] when the
    /// assignment has already been deactivated.
    pub fn deactivate(&mut self, clock: &impl Clock) -> Result<(), AssignmentDomainError> {
        if !self.is_active {
            return Err(AssignmentDomainError::AlreadyInactive(self.id));
        }
        self.is_active = false;
        self.updated_at = clock.utc();
        Ok(())
    }
}
