//! Client task aggregate root and its lifecycle state machine.

use super::{ClientTaskId, ParseClientTaskStatusError, WorklistDomainError};
use crate::assignment::domain::ClientLoanTypeId;
use crate::catalog::domain::{TaskPriority, TaskTemplate, TemplateId};
use crate::workspace::domain::{Role, UserId, WorkspaceId};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Client task lifecycle status.
///
/// `overdue` is deliberately absent: it is a derived property of a
/// non-terminal task whose due date has passed, computed via
/// [`ClientTask::is_overdue`], never a stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientTaskStatus {
    /// Work has not started.
    Pending,
    /// Work is underway.
    InProgress,
    /// Work is finished; terminal.
    Completed,
    /// Step was waived; terminal.
    Skipped,
}

impl ClientTaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Returns whether a transition from `self` to `target` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Pending, Self::InProgress | Self::Completed | Self::Skipped)
            | (Self::InProgress, Self::Completed | Self::Skipped) => true,
            _ => false,
        }
    }
}

impl TryFrom<&str> for ClientTaskStatus {
    type Error = ParseClientTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ParseClientTaskStatusError(value.to_owned())),
        }
    }
}

/// Template fields copied verbatim at materialization time.
///
/// The snapshot keeps the originating template identifier for traceability
/// and deduplication only; it is never re-read after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Originating template.
    pub template_id: TemplateId,
    /// Copied display title.
    pub title: String,
    /// Copied instructions.
    pub instructions: String,
    /// Copied assignee role for role-based routing.
    pub assignee_role: Role,
    /// Copied required flag.
    pub is_required: bool,
    /// Copied due offset in calendar days.
    pub due_in_days: u32,
    /// Copied document proof flag.
    pub document_proof_required: bool,
    /// Copied urgency.
    pub priority: TaskPriority,
    /// Copied materialization sequence position.
    pub order: i32,
}

impl TaskSnapshot {
    /// Copies the materializable fields from a task template.
    #[must_use]
    pub fn from_template(template: &TaskTemplate) -> Self {
        Self {
            template_id: template.id(),
            title: template.title().as_str().to_owned(),
            instructions: template.instructions().to_owned(),
            assignee_role: template.assignee_role(),
            is_required: template.is_required(),
            due_in_days: template.due_in_days(),
            document_proof_required: template.document_proof_required(),
            priority: template.priority(),
            order: template.order(),
        }
    }
}

/// Client task aggregate root.
///
/// The snapshot fields never change after creation; only status,
/// completion, assignee, and client notes are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTask {
    id: ClientTaskId,
    workspace_id: WorkspaceId,
    client_loan_type_id: ClientLoanTypeId,
    snapshot: TaskSnapshot,
    due_date: DateTime<Utc>,
    status: ClientTaskStatus,
    completed_at: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
    client_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted client task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedClientTaskData {
    /// Persisted identifier.
    pub id: ClientTaskId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Owning assignment.
    pub client_loan_type_id: ClientLoanTypeId,
    /// Persisted template snapshot.
    pub snapshot: TaskSnapshot,
    /// Persisted absolute due date.
    pub due_date: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: ClientTaskStatus,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted assignee.
    pub assigned_to: Option<UserId>,
    /// Persisted client notes.
    pub client_notes: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ClientTask {
    /// Materializes a pending task from a template snapshot.
    ///
    /// The due date is `assigned_at` plus the snapshot's due offset in
    /// calendar days; the assignee is left unset for later role-based
    /// routing.
    #[must_use]
    pub fn materialize(
        workspace_id: WorkspaceId,
        client_loan_type_id: ClientLoanTypeId,
        snapshot: TaskSnapshot,
        assigned_at: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let due_date = assigned_at + Duration::days(i64::from(snapshot.due_in_days));
        Self {
            id: ClientTaskId::new(),
            workspace_id,
            client_loan_type_id,
            snapshot,
            due_date,
            status: ClientTaskStatus::Pending,
            completed_at: None,
            assigned_to: None,
            client_notes: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a client task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedClientTaskData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            client_loan_type_id: data.client_loan_type_id,
            snapshot: data.snapshot,
            due_date: data.due_date,
            status: data.status,
            completed_at: data.completed_at,
            assigned_to: data.assigned_to,
            client_notes: data.client_notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> ClientTaskId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the owning assignment.
    #[must_use]
    pub const fn client_loan_type_id(&self) -> ClientLoanTypeId {
        self.client_loan_type_id
    }

    /// Returns the immutable template snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &TaskSnapshot {
        &self.snapshot
    }

    /// Returns the absolute due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ClientTaskStatus {
        self.status
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the routed assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the client notes, if any.
    #[must_use]
    pub fn client_notes(&self) -> Option<&str> {
        self.client_notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is overdue at `now`.
    ///
    /// A task is overdue exactly when its status is non-terminal and its
    /// due date has passed; every read path shares this one definition.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.due_date < now
    }

    /// Transitions the task to a new lifecycle status.
    ///
    /// Entering [`ClientTaskStatus::Completed`] stamps `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`WorklistDomainError::InvalidStatusTransition`] when the
    /// state machine forbids the transition; terminal states reject every
    /// transition.
    pub fn transition_to(
        &mut self,
        target: ClientTaskStatus,
        clock: &impl Clock,
    ) -> Result<(), WorklistDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(WorklistDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        let timestamp = clock.utc();
        if target == ClientTaskStatus::Completed {
            self.completed_at = Some(timestamp);
        }
        self.status = target;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Routes the task to a user without changing its status.
    pub fn assign_to(&mut self, user_id: UserId, clock: &impl Clock) {
        self.assigned_to = Some(user_id);
        self.updated_at = clock.utc();
    }

    /// Records free-text notes from the client.
    pub fn record_client_notes(&mut self, notes: impl Into<String>, clock: &impl Clock) {
        self.client_notes = Some(notes.into());
        self.updated_at = clock.utc();
    }
}
