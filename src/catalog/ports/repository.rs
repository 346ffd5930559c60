//! Repository port for loan type, task template, and association persistence.

use crate::catalog::domain::{LoanType, LoanTypeId, TaskTemplate, TemplateId};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Catalog persistence contract.
///
/// Association reads resolve the join set defensively: a row pointing at a
/// definition that no longer exists is silently skipped, never an error.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Stores a new loan type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateLoanType`] when the
    /// identifier already exists.
    async fn store_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()>;

    /// Persists changes to an existing loan type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::LoanTypeNotFound`] when the loan
    /// type does not exist.
    async fn update_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()>;

    /// Deletes a loan type and cascades removal of its association rows.
    ///
    /// Tasks already materialized under assignments of this loan type are
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::LoanTypeNotFound`] when the loan
    /// type does not exist.
    async fn delete_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<()>;

    /// Finds a loan type by identifier.
    ///
    /// Returns `None` when the loan type does not exist.
    async fn find_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<Option<LoanType>>;

    /// Returns all loan types in a workspace.
    async fn list_loan_types(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<LoanType>>;

    /// Stores a new task template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateTemplate`] when the
    /// identifier already exists or
    /// [`CatalogRepositoryError::DuplicateTemplateTitle`] when another
    /// template in the workspace carries the same case-folded title.
    async fn store_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()>;

    /// Persists changes to an existing task template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::TemplateNotFound`] when the template
    /// does not exist or [`CatalogRepositoryError::DuplicateTemplateTitle`]
    /// when the new title collides with a different template in the same
    /// workspace.
    async fn update_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()>;

    /// Deletes a task template and cascades removal of its association rows.
    ///
    /// Tasks already materialized from this template are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::TemplateNotFound`] when the template
    /// does not exist.
    async fn delete_template(&self, id: TemplateId) -> CatalogRepositoryResult<()>;

    /// Finds a task template by identifier.
    ///
    /// Returns `None` when the template does not exist.
    async fn find_template(&self, id: TemplateId) -> CatalogRepositoryResult<Option<TaskTemplate>>;

    /// Returns all task templates in a workspace.
    async fn list_templates(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>>;

    /// Atomically replaces the full association set for a template.
    ///
    /// Concurrent readers observe either the old set or the new set, never a
    /// partial mix.
    async fn replace_associations(
        &self,
        template_id: TemplateId,
        loan_type_ids: &[LoanTypeId],
    ) -> CatalogRepositoryResult<()>;

    /// Returns the templates associated with a loan type.
    ///
    /// Dangling association rows are skipped. No ordering is guaranteed;
    /// callers sort by materialization sequence.
    async fn templates_for_loan_type(
        &self,
        loan_type_id: LoanTypeId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>>;

    /// Returns the loan types a template is associated with.
    ///
    /// Dangling association rows are skipped.
    async fn loan_types_for_template(
        &self,
        template_id: TemplateId,
    ) -> CatalogRepositoryResult<Vec<LoanType>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// A loan type with the same identifier already exists.
    #[error("duplicate loan type identifier: {0}")]
    DuplicateLoanType(LoanTypeId),

    /// The loan type was not found.
    #[error("loan type not found: {0}")]
    LoanTypeNotFound(LoanTypeId),

    /// A template with the same identifier already exists.
    #[error("duplicate task template identifier: {0}")]
    DuplicateTemplate(TemplateId),

    /// Another template in the workspace carries the same case-folded title.
    #[error("duplicate task template title '{title}' in workspace {workspace_id}")]
    DuplicateTemplateTitle {
        /// Workspace owning both templates.
        workspace_id: WorkspaceId,
        /// The colliding display title.
        title: String,
    },

    /// The task template was not found.
    #[error("task template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
