//! Diesel row models for catalog persistence.

use super::schema::{loan_types, task_templates, template_associations};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for loan type records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoanTypeRow {
    /// Loan type identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional product category label.
    pub category: Option<String>,
    /// Ordered workflow stage labels as a JSON array.
    pub stages: Value,
    /// Availability status.
    pub status: String,
    /// Optional loan amount bounds payload.
    pub amount_range: Option<Value>,
    /// Optional interest rate bounds payload.
    pub rate_range: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for loan type records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = loan_types)]
#[diesel(treat_none_as_null = true)]
pub struct NewLoanTypeRow {
    /// Loan type identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional product category label.
    pub category: Option<String>,
    /// Ordered workflow stage labels as a JSON array.
    pub stages: Value,
    /// Availability status.
    pub status: String,
    /// Optional loan amount bounds payload.
    pub amount_range: Option<Value>,
    /// Optional interest rate bounds payload.
    pub rate_range: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task template records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskTemplateRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Display title.
    pub title: String,
    /// Case-folded title uniqueness key.
    pub title_key: String,
    /// Role the materialized task is routed to.
    pub assignee_role: String,
    /// Free-text instructions.
    pub instructions: String,
    /// Whether the step may be skipped.
    pub is_required: bool,
    /// Due offset in calendar days.
    pub due_in_days: i32,
    /// Whether proof-of-document upload is expected.
    pub document_proof_required: bool,
    /// Task urgency.
    pub priority: String,
    /// Materialization sequence position.
    pub task_order: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for task template records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = task_templates)]
pub struct NewTaskTemplateRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// Display title.
    pub title: String,
    /// Case-folded title uniqueness key.
    pub title_key: String,
    /// Role the materialized task is routed to.
    pub assignee_role: String,
    /// Free-text instructions.
    pub instructions: String,
    /// Whether the step may be skipped.
    pub is_required: bool,
    /// Due offset in calendar days.
    pub due_in_days: i32,
    /// Whether proof-of-document upload is expected.
    pub document_proof_required: bool,
    /// Task urgency.
    pub priority: String,
    /// Materialization sequence position.
    pub task_order: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for association rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = template_associations)]
pub struct NewAssociationRow {
    /// Associated template.
    pub template_id: uuid::Uuid,
    /// Associated loan type.
    pub loan_type_id: uuid::Uuid,
}
