//! Task template aggregate root and its value objects.

use super::{CatalogDomainError, ParseTaskPriorityError, TemplateId};
use crate::workspace::domain::{Role, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported due offset, in calendar days.
const MAX_DUE_OFFSET_DAYS: u32 = 3650;

/// Task urgency copied verbatim onto materialized tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can slip without affecting the origination timeline.
    Low,
    /// Default urgency.
    Normal,
    /// Blocks downstream steps if delayed.
    High,
    /// Requires immediate attention.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated task template title.
///
/// The trimmed, case-folded form is the per-workspace uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTitle(String);

impl TemplateTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyTemplateTitle`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogDomainError::EmptyTemplateTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as displayed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the case-folded uniqueness key.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for TemplateTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TemplateTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task template aggregate root.
///
/// Templates are independent of any single loan type; the association set
/// decides where they apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    id: TemplateId,
    workspace_id: WorkspaceId,
    title: TemplateTitle,
    assignee_role: Role,
    instructions: String,
    is_required: bool,
    due_in_days: u32,
    document_proof_required: bool,
    priority: TaskPriority,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a task template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskTemplate {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Display title; unique per workspace, case-insensitive.
    pub title: TemplateTitle,
    /// Role the materialized task is routed to.
    pub assignee_role: Role,
    /// Free-text instructions shown on the materialized task.
    pub instructions: String,
    /// Whether the step may be skipped.
    pub is_required: bool,
    /// Due offset in calendar days from assignment time.
    pub due_in_days: u32,
    /// Whether proof-of-document upload is expected.
    pub document_proof_required: bool,
    /// Task urgency.
    pub priority: TaskPriority,
    /// Materialization sequence position.
    pub order: i32,
}

/// Field-level patch applied to an existing task template.
///
/// `None` fields are left unchanged. Edits never propagate to tasks already
/// materialized from this template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateUpdate {
    /// Replacement title.
    pub title: Option<TemplateTitle>,
    /// Replacement assignee role.
    pub assignee_role: Option<Role>,
    /// Replacement instructions.
    pub instructions: Option<String>,
    /// Replacement required flag.
    pub is_required: Option<bool>,
    /// Replacement due offset in calendar days.
    pub due_in_days: Option<u32>,
    /// Replacement document proof flag.
    pub document_proof_required: Option<bool>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement sequence position.
    pub order: Option<i32>,
}

/// Parameter object for reconstructing a persisted task template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskTemplateData {
    /// Persisted identifier.
    pub id: TemplateId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Persisted title.
    pub title: TemplateTitle,
    /// Persisted assignee role.
    pub assignee_role: Role,
    /// Persisted instructions.
    pub instructions: String,
    /// Persisted required flag.
    pub is_required: bool,
    /// Persisted due offset.
    pub due_in_days: u32,
    /// Persisted document proof flag.
    pub document_proof_required: bool,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted sequence position.
    pub order: i32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskTemplate {
    /// Creates a new task template after validating its fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::DueOffsetTooLarge`] when the due offset
    /// exceeds the supported maximum.
    pub fn create(data: NewTaskTemplate, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        validate_due_offset(data.due_in_days)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TemplateId::new(),
            workspace_id: data.workspace_id,
            title: data.title,
            assignee_role: data.assignee_role,
            instructions: data.instructions,
            is_required: data.is_required,
            due_in_days: data.due_in_days,
            document_proof_required: data.document_proof_required,
            priority: data.priority,
            order: data.order,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task template from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskTemplateData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            title: data.title,
            assignee_role: data.assignee_role,
            instructions: data.instructions,
            is_required: data.is_required,
            due_in_days: data.due_in_days,
            document_proof_required: data.document_proof_required,
            priority: data.priority,
            order: data.order,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the display title.
    #[must_use]
    pub const fn title(&self) -> &TemplateTitle {
        &self.title
    }

    /// Returns the assignee role.
    #[must_use]
    pub const fn assignee_role(&self) -> Role {
        self.assignee_role
    }

    /// Returns the instructions text.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns whether the step may be skipped.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    /// Returns the due offset in calendar days.
    #[must_use]
    pub const fn due_in_days(&self) -> u32 {
        self.due_in_days
    }

    /// Returns whether proof-of-document upload is expected.
    #[must_use]
    pub const fn document_proof_required(&self) -> bool {
        self.document_proof_required
    }

    /// Returns the task urgency.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the materialization sequence position.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
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

    /// Applies a field-level patch, revalidating changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::DueOffsetTooLarge`] when a replacement
    /// due offset exceeds the supported maximum; the aggregate is left
    /// unchanged on error.
    pub fn apply_update(
        &mut self,
        update: TemplateUpdate,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        if let Some(due_in_days) = update.due_in_days {
            validate_due_offset(due_in_days)?;
            self.due_in_days = due_in_days;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(assignee_role) = update.assignee_role {
            self.assignee_role = assignee_role;
        }
        if let Some(instructions) = update.instructions {
            self.instructions = instructions;
        }
        if let Some(is_required) = update.is_required {
            self.is_required = is_required;
        }
        if let Some(document_proof_required) = update.document_proof_required {
            self.document_proof_required = document_proof_required;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}

const fn validate_due_offset(due_in_days: u32) -> Result<(), CatalogDomainError> {
    if due_in_days > MAX_DUE_OFFSET_DAYS {
        return Err(CatalogDomainError::DueOffsetTooLarge(due_in_days));
    }
    Ok(())
}
