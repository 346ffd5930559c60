//! Diesel row models for assignment persistence.

use super::schema::client_loan_types;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for assignment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = client_loan_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientLoanTypeRow {
    /// Assignment identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// The assigned client.
    pub client_id: uuid::Uuid,
    /// The assigned loan type.
    pub loan_type_id: uuid::Uuid,
    /// Who performed the assignment.
    pub assigned_by: uuid::Uuid,
    /// When the assignment was made.
    pub assigned_at: DateTime<Utc>,
    /// Whether the assignment is still active.
    pub is_active: bool,
    /// Optional client-facing display position.
    pub custom_order: Option<i32>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and changeset model for assignment records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = client_loan_types)]
#[diesel(treat_none_as_null = true)]
pub struct NewClientLoanTypeRow {
    /// Assignment identifier.
    pub id: uuid::Uuid,
    /// Owning workspace.
    pub workspace_id: uuid::Uuid,
    /// The assigned client.
    pub client_id: uuid::Uuid,
    /// The assigned loan type.
    pub loan_type_id: uuid::Uuid,
    /// Who performed the assignment.
    pub assigned_by: uuid::Uuid,
    /// When the assignment was made.
    pub assigned_at: DateTime<Utc>,
    /// Whether the assignment is still active.
    pub is_active: bool,
    /// Optional client-facing display position.
    pub custom_order: Option<i32>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
