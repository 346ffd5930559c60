//! Shared test helpers wiring the full engine onto in-memory adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use originate::assignment::adapters::memory::InMemoryAssignmentRepository;
use originate::assignment::services::AssignmentService;
use originate::catalog::adapters::memory::InMemoryCatalogRepository;
use originate::catalog::domain::{LoanType, TaskPriority, TaskTemplate};
use originate::catalog::services::{
    AssociationResolver, CreateLoanTypeRequest, CreateTaskTemplateRequest, DefinitionService,
};
use originate::worklist::adapters::memory::InMemoryClientTaskRepository;
use originate::worklist::services::TaskLifecycleService;
use originate::workspace::adapters::memory::InMemoryMembershipDirectory;
use originate::workspace::domain::{ClientId, Role, UserId, WorkspaceId};
use rstest::fixture;

/// The full engine wired onto in-memory adapters, with one workspace seeded
/// with an advisor and a client member.
pub struct Engine {
    pub definitions: DefinitionService<InMemoryCatalogRepository, DefaultClock>,
    pub resolver: AssociationResolver<InMemoryCatalogRepository>,
    pub assignments: AssignmentService<
        InMemoryMembershipDirectory,
        InMemoryAssignmentRepository,
        InMemoryCatalogRepository,
        InMemoryClientTaskRepository,
        DefaultClock,
    >,
    pub worklist: TaskLifecycleService<InMemoryClientTaskRepository, DefaultClock>,
    pub workspace_id: WorkspaceId,
    pub advisor: UserId,
    pub client: ClientId,
}

/// Provides a freshly seeded engine for each test.
#[fixture]
pub fn engine() -> Engine {
    let directory = Arc::new(InMemoryMembershipDirectory::new());
    let catalog = Arc::new(InMemoryCatalogRepository::new());
    let assignment_repo = Arc::new(InMemoryAssignmentRepository::new());
    let task_repo = Arc::new(InMemoryClientTaskRepository::new());
    let clock = Arc::new(DefaultClock);

    let workspace_id = WorkspaceId::new();
    let advisor = UserId::new();
    let client = ClientId::new();
    directory
        .grant(workspace_id, advisor, Role::Advisor)
        .expect("advisor granted");
    directory
        .grant(workspace_id, client.into_user_id(), Role::Client)
        .expect("client granted");

    Engine {
        definitions: DefinitionService::new(Arc::clone(&catalog), Arc::clone(&clock)),
        resolver: AssociationResolver::new(Arc::clone(&catalog)),
        assignments: AssignmentService::new(
            directory,
            assignment_repo,
            Arc::clone(&catalog),
            Arc::clone(&task_repo),
            Arc::clone(&clock),
        ),
        worklist: TaskLifecycleService::new(task_repo, clock),
        workspace_id,
        advisor,
        client,
    }
}

impl Engine {
    /// Creates a loan type with a single display stage.
    ///
    /// # Errors
    ///
    /// Returns an error when the definition service rejects the input.
    pub async fn loan_type(&self, name: &str) -> eyre::Result<LoanType> {
        let loan_type = self
            .definitions
            .create_loan_type(CreateLoanTypeRequest::new(
                self.workspace_id,
                name,
                vec!["application".to_owned(), "closing".to_owned()],
            ))
            .await?;
        Ok(loan_type)
    }

    /// Creates a template and associates it with the given loan type.
    ///
    /// # Errors
    ///
    /// Returns an error when template creation or association fails.
    pub async fn associated_template(
        &self,
        loan_type: &LoanType,
        title: &str,
        due_in_days: u32,
        order: i32,
    ) -> eyre::Result<TaskTemplate> {
        let template = self
            .definitions
            .create_task_template(
                CreateTaskTemplateRequest::new(self.workspace_id, title, Role::Advisor, due_in_days)
                    .with_order(order)
                    .with_priority(TaskPriority::Normal),
            )
            .await?;
        self.resolver
            .associate_with_loan_types(self.workspace_id, template.id(), vec![loan_type.id()])
            .await?;
        Ok(template)
    }
}
