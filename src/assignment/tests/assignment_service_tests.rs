//! Service orchestration tests for role-authorized client assignment.

use std::sync::Arc;

use crate::assignment::{
    adapters::memory::InMemoryAssignmentRepository,
    domain::{ClientLoanType, ClientLoanTypeId, NewClientLoanType},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
    services::{AssignLoanTypeRequest, AssignmentError, AssignmentService},
};
use crate::catalog::{
    adapters::memory::InMemoryCatalogRepository,
    domain::{LoanType, LoanTypeId, NewLoanType},
    ports::CatalogRepository,
};
use crate::worklist::adapters::memory::InMemoryClientTaskRepository;
use crate::workspace::{
    domain::{ClientId, Role, UserId, WorkspaceId},
    ports::{MembershipDirectory, MembershipError, MembershipResult},
};
use crate::workspace::adapters::memory::InMemoryMembershipDirectory;
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};

mock! {
    Directory {}

    #[async_trait]
    impl MembershipDirectory for Directory {
        async fn role_of(
            &self,
            workspace_id: WorkspaceId,
            user_id: UserId,
        ) -> MembershipResult<Option<Role>>;
    }
}

mock! {
    Assignments {}

    #[async_trait]
    impl AssignmentRepository for Assignments {
        async fn store(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()>;
        async fn update(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()>;
        async fn remove(&self, id: ClientLoanTypeId) -> AssignmentRepositoryResult<()>;
        async fn find_by_id(
            &self,
            id: ClientLoanTypeId,
        ) -> AssignmentRepositoryResult<Option<ClientLoanType>>;
        async fn find_active(
            &self,
            client_id: ClientId,
            loan_type_id: LoanTypeId,
        ) -> AssignmentRepositoryResult<Option<ClientLoanType>>;
        async fn list_by_client(
            &self,
            client_id: ClientId,
        ) -> AssignmentRepositoryResult<Vec<ClientLoanType>>;
        async fn list_by_workspace(
            &self,
            workspace_id: WorkspaceId,
        ) -> AssignmentRepositoryResult<Vec<ClientLoanType>>;
    }
}

type TestService = AssignmentService<
    InMemoryMembershipDirectory,
    InMemoryAssignmentRepository,
    InMemoryCatalogRepository,
    InMemoryClientTaskRepository,
    DefaultClock,
>;

struct Harness {
    directory: Arc<InMemoryMembershipDirectory>,
    catalog: Arc<InMemoryCatalogRepository>,
    assignments: Arc<InMemoryAssignmentRepository>,
    service: TestService,
    workspace_id: WorkspaceId,
    advisor: UserId,
    client: ClientId,
}

#[fixture]
fn harness() -> Harness {
    let directory = Arc::new(InMemoryMembershipDirectory::new());
    let catalog = Arc::new(InMemoryCatalogRepository::new());
    let assignments = Arc::new(InMemoryAssignmentRepository::new());
    let workspace_id = WorkspaceId::new();
    let advisor = UserId::new();
    let client = ClientId::new();
    directory
        .grant(workspace_id, advisor, Role::Advisor)
        .expect("advisor granted");
    directory
        .grant(workspace_id, client.into_user_id(), Role::Client)
        .expect("client granted");

    Harness {
        service: AssignmentService::new(
            Arc::clone(&directory),
            Arc::clone(&assignments),
            Arc::clone(&catalog),
            Arc::new(InMemoryClientTaskRepository::new()),
            Arc::new(DefaultClock),
        ),
        directory,
        catalog,
        assignments,
        workspace_id,
        advisor,
        client,
    }
}

impl Harness {
    async fn seed_loan_type(&self) -> LoanTypeId {
        self.seed_loan_type_in(self.workspace_id).await
    }

    async fn seed_loan_type_in(&self, workspace_id: WorkspaceId) -> LoanTypeId {
        let loan_type = LoanType::create(
            NewLoanType {
                workspace_id,
                name: "FHA Loan".to_owned(),
                description: None,
                category: None,
                stages: vec!["application".to_owned()],
                amount_range: None,
                rate_range: None,
            },
            &DefaultClock,
        )
        .expect("valid loan type");
        self.catalog
            .store_loan_type(&loan_type)
            .await
            .expect("loan type stored");
        loan_type.id()
    }

    fn request(&self, loan_type_id: LoanTypeId) -> AssignLoanTypeRequest {
        AssignLoanTypeRequest::new(self.workspace_id, self.client, loan_type_id, self.advisor)
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_materializes_the_default_worklist(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;

    let outcome = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("assignment succeeds");

    assert!(outcome.newly_assigned);
    assert!(outcome.assignment.is_active());
    assert_eq!(outcome.tasks.len(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeat_assignment_returns_the_existing_record(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;

    let first = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("first assignment");
    let second = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("repeat assignment");

    assert!(!second.newly_assigned);
    assert_eq!(second.assignment.id(), first.assignment.id());
    assert_eq!(second.tasks.len(), first.tasks.len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_may_assign_but_clients_may_not(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let staff = UserId::new();
    harness
        .directory
        .grant(harness.workspace_id, staff, Role::Staff)
        .expect("staff granted");

    let request = AssignLoanTypeRequest::new(
        harness.workspace_id,
        harness.client,
        loan_type_id,
        staff,
    );
    harness
        .service
        .assign_loan_type_to_client(request)
        .await
        .expect("staff may assign");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn caller_without_workflow_role_is_rejected(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let outsider = UserId::new();

    let request = AssignLoanTypeRequest::new(
        harness.workspace_id,
        harness.client,
        loan_type_id,
        outsider,
    );
    let result = harness.service.assign_loan_type_to_client(request).await;

    assert!(matches!(
        result,
        Err(AssignmentError::PermissionDenied { user_id, .. }) if user_id == outsider
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn target_without_client_role_is_rejected(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let not_a_client = ClientId::new();
    harness
        .directory
        .grant(
            harness.workspace_id,
            not_a_client.into_user_id(),
            Role::Staff,
        )
        .expect("staff granted");

    let request = AssignLoanTypeRequest::new(
        harness.workspace_id,
        not_a_client,
        loan_type_id,
        harness.advisor,
    );
    let result = harness.service.assign_loan_type_to_client(request).await;

    assert!(matches!(
        result,
        Err(AssignmentError::ClientNotInWorkspace { client_id, .. }) if client_id == not_a_client
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_workspace_loan_type_reads_as_not_found(harness: Harness) {
    let foreign_loan_type = harness.seed_loan_type_in(WorkspaceId::new()).await;

    let result = harness
        .service
        .assign_loan_type_to_client(harness.request(foreign_loan_type))
        .await;

    assert!(matches!(
        result,
        Err(AssignmentError::LoanTypeNotFound(id)) if id == foreign_loan_type
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivation_frees_the_pair_for_a_fresh_assignment(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let first = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("first assignment");

    harness
        .service
        .deactivate_assignment(harness.workspace_id, first.assignment.id(), harness.advisor)
        .await
        .expect("deactivation succeeds");

    let second = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("fresh assignment after deactivation");

    assert!(second.newly_assigned);
    assert_ne!(second.assignment.id(), first.assignment.id());
    assert_eq!(second.tasks.len(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivating_a_foreign_workspace_assignment_is_rejected(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let outcome = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("assignment succeeds");

    let foreign_workspace = WorkspaceId::new();
    harness
        .directory
        .grant(foreign_workspace, harness.advisor, Role::Advisor)
        .expect("advisor granted elsewhere");
    let result = harness
        .service
        .deactivate_assignment(foreign_workspace, outcome.assignment.id(), harness.advisor)
        .await;

    assert!(matches!(
        result,
        Err(AssignmentError::AssignmentNotFound(id)) if id == outcome.assignment.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignments_for_client_lists_inactive_records_too(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let outcome = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("assignment succeeds");
    harness
        .service
        .deactivate_assignment(harness.workspace_id, outcome.assignment.id(), harness.advisor)
        .await
        .expect("deactivation succeeds");

    let listed = harness
        .service
        .assignments_for_client(harness.workspace_id, harness.client)
        .await
        .expect("assignments listed");

    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|assignment| !assignment.is_active()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn losing_a_store_race_returns_the_winning_assignment(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    let winner = ClientLoanType::new(
        NewClientLoanType {
            workspace_id: harness.workspace_id,
            client_id: harness.client,
            loan_type_id,
            assigned_by: harness.advisor,
            custom_order: None,
            notes: None,
        },
        &DefaultClock,
    );
    let winner_id = winner.id();

    // The pre-check sees no active assignment, the store loses to a
    // concurrent writer, and the re-fetch finds the winning record.
    let mut racing = MockAssignments::new();
    racing
        .expect_find_active()
        .times(1)
        .return_once(|_, _| Ok(None));
    let client_id = harness.client;
    racing.expect_store().times(1).return_once(move |_| {
        Err(AssignmentRepositoryError::DuplicateActiveAssignment {
            client_id,
            loan_type_id,
        })
    });
    racing
        .expect_find_active()
        .times(1)
        .return_once(move |_, _| Ok(Some(winner)));

    let service = AssignmentService::new(
        Arc::clone(&harness.directory),
        Arc::new(racing),
        Arc::clone(&harness.catalog),
        Arc::new(InMemoryClientTaskRepository::new()),
        Arc::new(DefaultClock),
    );

    let outcome = service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("race resolves to the winner");

    assert!(!outcome.newly_assigned);
    assert_eq!(outcome.assignment.id(), winner_id);
    assert_eq!(outcome.tasks.len(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeat_assignment_heals_a_leftover_without_a_worklist(harness: Harness) {
    let loan_type_id = harness.seed_loan_type().await;
    // An active assignment with no worklist is what a failed materialization
    // whose rollback also failed leaves behind.
    let leftover = ClientLoanType::new(
        NewClientLoanType {
            workspace_id: harness.workspace_id,
            client_id: harness.client,
            loan_type_id,
            assigned_by: harness.advisor,
            custom_order: None,
            notes: None,
        },
        &DefaultClock,
    );
    harness
        .assignments
        .store(&leftover)
        .await
        .expect("leftover stored");

    let outcome = harness
        .service
        .assign_loan_type_to_client(harness.request(loan_type_id))
        .await
        .expect("assignment succeeds");

    assert!(!outcome.newly_assigned);
    assert_eq!(outcome.assignment.id(), leftover.id());
    assert_eq!(outcome.tasks.len(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_failure_surfaces_as_a_membership_error() {
    let mut directory = MockDirectory::new();
    directory.expect_role_of().returning(|_, _| {
        Err(MembershipError::lookup(std::io::Error::other(
            "directory unavailable",
        )))
    });

    let service = AssignmentService::new(
        Arc::new(directory),
        Arc::new(InMemoryAssignmentRepository::new()),
        Arc::new(InMemoryCatalogRepository::new()),
        Arc::new(InMemoryClientTaskRepository::new()),
        Arc::new(DefaultClock),
    );
    let request = AssignLoanTypeRequest::new(
        WorkspaceId::new(),
        ClientId::new(),
        LoanTypeId::new(),
        UserId::new(),
    );

    let result = service.assign_loan_type_to_client(request).await;
    assert!(matches!(result, Err(AssignmentError::Membership(_))));
}
