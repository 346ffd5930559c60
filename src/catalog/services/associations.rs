//! Service layer for bidirectional template association resolution.

use super::definitions::{CatalogServiceError, CatalogServiceResult};
use crate::catalog::{
    domain::{LoanType, LoanTypeId, TaskTemplate, TemplateId},
    ports::CatalogRepository,
};
use crate::workspace::domain::WorkspaceId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Association resolution and replacement service.
///
/// Writes validate their targets; reads are defensive and treat dangling or
/// cross-workspace references as absent rather than failing.
#[derive(Clone)]
pub struct AssociationResolver<R>
where
    R: CatalogRepository,
{
    repository: Arc<R>,
}

impl<R> AssociationResolver<R>
where
    R: CatalogRepository,
{
    /// Creates a new association resolver.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Atomically replaces the full association set for a template.
    ///
    /// Duplicate loan type identifiers in the input are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::TemplateNotFound`] when the template is
    /// missing or belongs to another workspace, and
    /// [`CatalogServiceError::LoanTypeNotFound`] when a target loan type does
    /// not exist in the same workspace.
    pub async fn associate_with_loan_types(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
        loan_type_ids: Vec<LoanTypeId>,
    ) -> CatalogServiceResult<()> {
        let template_in_workspace = self
            .repository
            .find_template(template_id)
            .await?
            .is_some_and(|template| template.workspace_id() == workspace_id);
        if !template_in_workspace {
            return Err(CatalogServiceError::TemplateNotFound(template_id));
        }

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(loan_type_ids.len());
        for loan_type_id in loan_type_ids {
            if !seen.insert(loan_type_id) {
                continue;
            }
            let in_workspace = self
                .repository
                .find_loan_type(loan_type_id)
                .await?
                .is_some_and(|loan_type| loan_type.workspace_id() == workspace_id);
            if !in_workspace {
                return Err(CatalogServiceError::LoanTypeNotFound(loan_type_id));
            }
            targets.push(loan_type_id);
        }

        self.repository
            .replace_associations(template_id, &targets)
            .await?;
        debug!(
            template = %template_id,
            loan_types = targets.len(),
            "template association set replaced"
        );
        Ok(())
    }

    /// Returns the templates applying to a loan type, sorted ascending by
    /// materialization sequence position.
    ///
    /// A missing or cross-workspace loan type yields an empty set; dangling
    /// association rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn templates_for_loan_type(
        &self,
        workspace_id: WorkspaceId,
        loan_type_id: LoanTypeId,
    ) -> CatalogServiceResult<Vec<TaskTemplate>> {
        let loan_type_in_workspace = self
            .repository
            .find_loan_type(loan_type_id)
            .await?
            .is_some_and(|loan_type| loan_type.workspace_id() == workspace_id);
        if !loan_type_in_workspace {
            return Ok(Vec::new());
        }

        let mut templates = self.repository.templates_for_loan_type(loan_type_id).await?;
        templates.sort_by(|a, b| {
            a.order()
                .cmp(&b.order())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(templates)
    }

    /// Returns the loan types a template is associated with, sorted by name.
    ///
    /// A missing or cross-workspace template yields an empty set; dangling
    /// association rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn loan_types_for_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
    ) -> CatalogServiceResult<Vec<LoanType>> {
        let template_in_workspace = self
            .repository
            .find_template(template_id)
            .await?
            .is_some_and(|template| template.workspace_id() == workspace_id);
        if !template_in_workspace {
            return Ok(Vec::new());
        }

        let mut loan_types = self.repository.loan_types_for_template(template_id).await?;
        loan_types.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(loan_types)
    }
}
