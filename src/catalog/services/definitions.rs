//! Service layer for loan type and task template definitions.

use crate::catalog::{
    domain::{
        AmountRange, CatalogDomainError, LoanType, LoanTypeId, LoanTypeStatus, LoanTypeUpdate,
        NewLoanType, NewTaskTemplate, RateRange, TaskPriority, TaskTemplate, TemplateId,
        TemplateTitle, TemplateUpdate,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use crate::workspace::domain::{Role, WorkspaceId};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a loan type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoanTypeRequest {
    workspace_id: WorkspaceId,
    name: String,
    description: Option<String>,
    category: Option<String>,
    stages: Vec<String>,
    amount_range: Option<AmountRange>,
    rate_range: Option<RateRange>,
}

impl CreateLoanTypeRequest {
    /// Creates a request with required loan type fields.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        stages: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            workspace_id,
            name: name.into(),
            description: None,
            category: None,
            stages: stages.into_iter().collect(),
            amount_range: None,
            rate_range: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the product category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the loan amount bounds.
    #[must_use]
    pub const fn with_amount_range(mut self, amount_range: AmountRange) -> Self {
        self.amount_range = Some(amount_range);
        self
    }

    /// Sets the interest rate bounds.
    #[must_use]
    pub const fn with_rate_range(mut self, rate_range: RateRange) -> Self {
        self.rate_range = Some(rate_range);
        self
    }
}

/// Request payload for updating a loan type.
///
/// Unset fields leave the definition unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLoanTypeRequest {
    workspace_id: WorkspaceId,
    loan_type_id: LoanTypeId,
    update: LoanTypeUpdate,
}

impl UpdateLoanTypeRequest {
    /// Creates an empty update for the given loan type.
    #[must_use]
    pub fn new(workspace_id: WorkspaceId, loan_type_id: LoanTypeId) -> Self {
        Self {
            workspace_id,
            loan_type_id,
            update: LoanTypeUpdate::default(),
        }
    }

    /// Sets a replacement display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.update.name = Some(name.into());
        self
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.update.description = Some(description.into());
        self
    }

    /// Sets a replacement category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.update.category = Some(category.into());
        self
    }

    /// Sets a replacement stage list.
    #[must_use]
    pub fn with_stages(mut self, stages: impl IntoIterator<Item = String>) -> Self {
        self.update.stages = Some(stages.into_iter().collect());
        self
    }

    /// Sets a replacement availability status.
    #[must_use]
    pub const fn with_status(mut self, status: LoanTypeStatus) -> Self {
        self.update.status = Some(status);
        self
    }

    /// Sets replacement amount bounds.
    #[must_use]
    pub const fn with_amount_range(mut self, amount_range: AmountRange) -> Self {
        self.update.amount_range = Some(amount_range);
        self
    }

    /// Sets replacement rate bounds.
    #[must_use]
    pub const fn with_rate_range(mut self, rate_range: RateRange) -> Self {
        self.update.rate_range = Some(rate_range);
        self
    }
}

/// Request payload for creating a task template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskTemplateRequest {
    workspace_id: WorkspaceId,
    title: String,
    assignee_role: Role,
    instructions: String,
    is_required: bool,
    due_in_days: u32,
    document_proof_required: bool,
    priority: TaskPriority,
    order: i32,
}

impl CreateTaskTemplateRequest {
    /// Creates a request with required template fields.
    ///
    /// Defaults: required, no document proof, normal priority, order 0.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        title: impl Into<String>,
        assignee_role: Role,
        due_in_days: u32,
    ) -> Self {
        Self {
            workspace_id,
            title: title.into(),
            assignee_role,
            instructions: String::new(),
            is_required: true,
            due_in_days,
            document_proof_required: false,
            priority: TaskPriority::Normal,
            order: 0,
        }
    }

    /// Sets the instructions text.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Sets whether the step may be skipped.
    #[must_use]
    pub const fn with_is_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    /// Sets whether proof-of-document upload is expected.
    #[must_use]
    pub const fn with_document_proof_required(mut self, document_proof_required: bool) -> Self {
        self.document_proof_required = document_proof_required;
        self
    }

    /// Sets the task urgency.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the materialization sequence position.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Request payload for updating a task template.
///
/// Unset fields leave the definition unchanged. Edits never propagate to
/// tasks already materialized from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskTemplateRequest {
    workspace_id: WorkspaceId,
    template_id: TemplateId,
    title: Option<String>,
    update: TemplateUpdate,
}

impl UpdateTaskTemplateRequest {
    /// Creates an empty update for the given template.
    #[must_use]
    pub fn new(workspace_id: WorkspaceId, template_id: TemplateId) -> Self {
        Self {
            workspace_id,
            template_id,
            title: None,
            update: TemplateUpdate::default(),
        }
    }

    /// Sets a replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a replacement assignee role.
    #[must_use]
    pub const fn with_assignee_role(mut self, assignee_role: Role) -> Self {
        self.update.assignee_role = Some(assignee_role);
        self
    }

    /// Sets replacement instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.update.instructions = Some(instructions.into());
        self
    }

    /// Sets a replacement required flag.
    #[must_use]
    pub const fn with_is_required(mut self, is_required: bool) -> Self {
        self.update.is_required = Some(is_required);
        self
    }

    /// Sets a replacement due offset.
    #[must_use]
    pub const fn with_due_in_days(mut self, due_in_days: u32) -> Self {
        self.update.due_in_days = Some(due_in_days);
        self
    }

    /// Sets a replacement document proof flag.
    #[must_use]
    pub const fn with_document_proof_required(mut self, document_proof_required: bool) -> Self {
        self.update.document_proof_required = Some(document_proof_required);
        self
    }

    /// Sets a replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.update.priority = Some(priority);
        self
    }

    /// Sets a replacement sequence position.
    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.update.order = Some(order);
        self
    }
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// The loan type does not exist in the requesting workspace.
    #[error("loan type not found: {0}")]
    LoanTypeNotFound(LoanTypeId),

    /// The task template does not exist in the requesting workspace.
    #[error("task template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CatalogRepositoryError),
}

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Definition store orchestration service.
#[derive(Clone)]
pub struct DefinitionService<R, C>
where
    R: CatalogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DefinitionService<R, C>
where
    R: CatalogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new definition service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new loan type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn create_loan_type(
        &self,
        request: CreateLoanTypeRequest,
    ) -> CatalogServiceResult<LoanType> {
        let loan_type = LoanType::create(
            NewLoanType {
                workspace_id: request.workspace_id,
                name: request.name,
                description: request.description,
                category: request.category,
                stages: request.stages,
                amount_range: request.amount_range,
                rate_range: request.rate_range,
            },
            &*self.clock,
        )?;
        self.repository.store_loan_type(&loan_type).await?;
        debug!(loan_type = %loan_type.id(), workspace = %loan_type.workspace_id(), "loan type created");
        Ok(loan_type)
    }

    /// Updates an existing loan type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::LoanTypeNotFound`] when the loan type
    /// is missing or belongs to another workspace, or a validation or
    /// repository error otherwise.
    pub async fn update_loan_type(
        &self,
        request: UpdateLoanTypeRequest,
    ) -> CatalogServiceResult<LoanType> {
        let mut loan_type = self
            .find_workspace_loan_type(request.workspace_id, request.loan_type_id)
            .await?;
        loan_type.apply_update(request.update, &*self.clock)?;
        self.repository.update_loan_type(&loan_type).await?;
        Ok(loan_type)
    }

    /// Deletes a loan type, cascading removal of its association rows.
    ///
    /// Tasks already materialized under this loan type remain untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::LoanTypeNotFound`] when the loan type
    /// is missing or belongs to another workspace.
    pub async fn delete_loan_type(
        &self,
        workspace_id: WorkspaceId,
        loan_type_id: LoanTypeId,
    ) -> CatalogServiceResult<()> {
        self.find_workspace_loan_type(workspace_id, loan_type_id)
            .await?;
        self.repository.delete_loan_type(loan_type_id).await?;
        debug!(loan_type = %loan_type_id, "loan type deleted");
        Ok(())
    }

    /// Returns all loan types in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list_loan_types(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogServiceResult<Vec<LoanType>> {
        let mut loan_types = self.repository.list_loan_types(workspace_id).await?;
        loan_types.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(loan_types)
    }

    /// Creates a new task template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] with a duplicate-title
    /// error when another template in the workspace carries the same
    /// case-folded title, or a validation error for bad fields.
    pub async fn create_task_template(
        &self,
        request: CreateTaskTemplateRequest,
    ) -> CatalogServiceResult<TaskTemplate> {
        let title = TemplateTitle::new(request.title)?;
        let template = TaskTemplate::create(
            NewTaskTemplate {
                workspace_id: request.workspace_id,
                title,
                assignee_role: request.assignee_role,
                instructions: request.instructions,
                is_required: request.is_required,
                due_in_days: request.due_in_days,
                document_proof_required: request.document_proof_required,
                priority: request.priority,
                order: request.order,
            },
            &*self.clock,
        )?;
        self.repository.store_template(&template).await?;
        debug!(template = %template.id(), workspace = %template.workspace_id(), "task template created");
        Ok(template)
    }

    /// Updates an existing task template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::TemplateNotFound`] when the template is
    /// missing or belongs to another workspace, a duplicate-title repository
    /// error on collision, or a validation error for bad fields.
    pub async fn update_task_template(
        &self,
        request: UpdateTaskTemplateRequest,
    ) -> CatalogServiceResult<TaskTemplate> {
        let mut template = self
            .find_workspace_template(request.workspace_id, request.template_id)
            .await?;
        let mut update = request.update;
        update.title = request.title.map(TemplateTitle::new).transpose()?;
        template.apply_update(update, &*self.clock)?;
        self.repository.update_template(&template).await?;
        Ok(template)
    }

    /// Deletes a task template, cascading removal of its association rows.
    ///
    /// Tasks already materialized from this template remain untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::TemplateNotFound`] when the template is
    /// missing or belongs to another workspace.
    pub async fn delete_task_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
    ) -> CatalogServiceResult<()> {
        self.find_workspace_template(workspace_id, template_id)
            .await?;
        self.repository.delete_template(template_id).await?;
        debug!(template = %template_id, "task template deleted");
        Ok(())
    }

    /// Returns all task templates in a workspace, sorted by sequence
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list_task_templates(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogServiceResult<Vec<TaskTemplate>> {
        let mut templates = self.repository.list_templates(workspace_id).await?;
        templates.sort_by(|a, b| {
            a.order()
                .cmp(&b.order())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(templates)
    }

    async fn find_workspace_loan_type(
        &self,
        workspace_id: WorkspaceId,
        loan_type_id: LoanTypeId,
    ) -> CatalogServiceResult<LoanType> {
        let found: CatalogRepositoryResult<Option<LoanType>> =
            self.repository.find_loan_type(loan_type_id).await;
        found?
            .filter(|loan_type| loan_type.workspace_id() == workspace_id)
            .ok_or(CatalogServiceError::LoanTypeNotFound(loan_type_id))
    }

    async fn find_workspace_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
    ) -> CatalogServiceResult<TaskTemplate> {
        let found: CatalogRepositoryResult<Option<TaskTemplate>> =
            self.repository.find_template(template_id).await;
        found?
            .filter(|template| template.workspace_id() == workspace_id)
            .ok_or(CatalogServiceError::TemplateNotFound(template_id))
    }
}
