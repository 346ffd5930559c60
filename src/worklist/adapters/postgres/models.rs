//! Diesel row models for client task persistence.

use super::schema::client_tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for client task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = client_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Owning assignment.
    pub client_loan_type_id: uuid::Uuid,
    /// Originating template.
    pub template_id: uuid::Uuid,
    /// Copied display title.
    pub title: String,
    /// Copied instructions.
    pub instructions: String,
    /// Copied assignee role.
    pub assignee_role: String,
    /// Copied required flag.
    pub is_required: bool,
    /// Copied due offset in calendar days.
    pub due_in_days: i32,
    /// Copied document proof flag.
    pub document_proof_required: bool,
    /// Copied urgency.
    pub priority: String,
    /// Copied materialization sequence position.
    pub task_order: i32,
    /// Absolute due date.
    pub due_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Routed assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Free-text client notes.
    pub client_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for client task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = client_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewClientTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Owning assignment.
    pub client_loan_type_id: uuid::Uuid,
    /// Originating template.
    pub template_id: uuid::Uuid,
    /// Copied display title.
    pub title: String,
    /// Copied instructions.
    pub instructions: String,
    /// Copied assignee role.
    pub assignee_role: String,
    /// Copied required flag.
    pub is_required: bool,
    /// Copied due offset in calendar days.
    pub due_in_days: i32,
    /// Copied document proof flag.
    pub document_proof_required: bool,
    /// Copied urgency.
    pub priority: String,
    /// Copied materialization sequence position.
    pub task_order: i32,
    /// Absolute due date.
    pub due_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Routed assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Free-text client notes.
    pub client_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
