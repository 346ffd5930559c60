//! `PostgreSQL` repository implementation for assignment storage.

use super::{
    models::{ClientLoanTypeRow, NewClientLoanTypeRow},
    schema::client_loan_types,
};
use crate::assignment::{
    domain::{ClientLoanType, ClientLoanTypeId, PersistedClientLoanTypeData},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::catalog::domain::LoanTypeId;
use crate::workspace::domain::{ClientId, UserId, WorkspaceId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by assignment adapters.
pub type AssignmentPgPool = Pool<ConnectionManager<PgConnection>>;

/// Partial unique index backing the one-active-assignment-per-pair
/// invariant; it covers only rows with `is_active = true`.
const ACTIVE_PAIR_CONSTRAINT: &str = "idx_client_loan_types_active_pair_unique";

/// `PostgreSQL`-backed assignment repository.
#[derive(Debug, Clone)]
pub struct PostgresAssignmentRepository {
    pool: AssignmentPgPool,
}

impl PostgresAssignmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AssignmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AssignmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AssignmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AssignmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AssignmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn store(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()> {
        let new_row = to_row(assignment);
        let assignment_id = assignment.id();
        let client_id = assignment.client_id();
        let loan_type_id = assignment.loan_type_id();

        self.run_blocking(move |connection| {
            diesel::insert_into(client_loan_types::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    map_unique_violation(err, assignment_id, client_id, loan_type_id)
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, assignment: &ClientLoanType) -> AssignmentRepositoryResult<()> {
        let changeset = to_row(assignment);
        let assignment_id = assignment.id();
        let client_id = assignment.client_id();
        let loan_type_id = assignment.loan_type_id();

        self.run_blocking(move |connection| {
            let updated =
                diesel::update(client_loan_types::table.find(assignment_id.into_inner()))
                    .set(&changeset)
                    .execute(connection)
                    .map_err(|err| {
                        map_unique_violation(err, assignment_id, client_id, loan_type_id)
                    })?;
            if updated == 0 {
                return Err(AssignmentRepositoryError::NotFound(assignment_id));
            }
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: ClientLoanTypeId) -> AssignmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(client_loan_types::table.find(id.into_inner()))
                .execute(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(AssignmentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ClientLoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>> {
        self.run_blocking(move |connection| {
            let row = client_loan_types::table
                .find(id.into_inner())
                .select(ClientLoanTypeRow::as_select())
                .first::<ClientLoanTypeRow>(connection)
                .optional()
                .map_err(AssignmentRepositoryError::persistence)?;
            Ok(row.map(row_to_assignment))
        })
        .await
    }

    async fn find_active(
        &self,
        client_id: ClientId,
        loan_type_id: LoanTypeId,
    ) -> AssignmentRepositoryResult<Option<ClientLoanType>> {
        self.run_blocking(move |connection| {
            let row = client_loan_types::table
                .filter(client_loan_types::client_id.eq(client_id.into_inner()))
                .filter(client_loan_types::loan_type_id.eq(loan_type_id.into_inner()))
                .filter(client_loan_types::is_active.eq(true))
                .select(ClientLoanTypeRow::as_select())
                .first::<ClientLoanTypeRow>(connection)
                .optional()
                .map_err(AssignmentRepositoryError::persistence)?;
            Ok(row.map(row_to_assignment))
        })
        .await
    }

    async fn list_by_client(
        &self,
        client_id: ClientId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>> {
        self.run_blocking(move |connection| {
            let rows = client_loan_types::table
                .filter(client_loan_types::client_id.eq(client_id.into_inner()))
                .select(ClientLoanTypeRow::as_select())
                .load::<ClientLoanTypeRow>(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_assignment).collect())
        })
        .await
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> AssignmentRepositoryResult<Vec<ClientLoanType>> {
        self.run_blocking(move |connection| {
            let rows = client_loan_types::table
                .filter(client_loan_types::workspace_id.eq(workspace_id.into_inner()))
                .select(ClientLoanTypeRow::as_select())
                .load::<ClientLoanTypeRow>(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_assignment).collect())
        })
        .await
    }
}

fn map_unique_violation(
    err: DieselError,
    assignment_id: ClientLoanTypeId,
    client_id: ClientId,
    loan_type_id: LoanTypeId,
) -> AssignmentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(ACTIVE_PAIR_CONSTRAINT) =>
        {
            AssignmentRepositoryError::DuplicateActiveAssignment {
                client_id,
                loan_type_id,
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AssignmentRepositoryError::DuplicateAssignment(assignment_id)
        }
        _ => AssignmentRepositoryError::persistence(err),
    }
}

fn to_row(assignment: &ClientLoanType) -> NewClientLoanTypeRow {
    NewClientLoanTypeRow {
        id: assignment.id().into_inner(),
        workspace_id: assignment.workspace_id().into_inner(),
        client_id: assignment.client_id().into_inner(),
        loan_type_id: assignment.loan_type_id().into_inner(),
        assigned_by: assignment.assigned_by().into_inner(),
        assigned_at: assignment.assigned_at(),
        is_active: assignment.is_active(),
        custom_order: assignment.custom_order(),
        notes: assignment.notes().map(str::to_owned),
        updated_at: assignment.updated_at(),
    }
}

fn row_to_assignment(row: ClientLoanTypeRow) -> ClientLoanType {
    let ClientLoanTypeRow {
        id,
        workspace_id,
        client_id,
        loan_type_id,
        assigned_by,
        assigned_at,
        is_active,
        custom_order,
        notes,
        updated_at,
    } = row;

    ClientLoanType::from_persisted(PersistedClientLoanTypeData {
        id: ClientLoanTypeId::from_uuid(id),
        workspace_id: WorkspaceId::from_uuid(workspace_id),
        client_id: ClientId::from_uuid(client_id),
        loan_type_id: LoanTypeId::from_uuid(loan_type_id),
        assigned_by: UserId::from_uuid(assigned_by),
        assigned_at,
        is_active,
        custom_order,
        notes,
        updated_at,
    })
}
