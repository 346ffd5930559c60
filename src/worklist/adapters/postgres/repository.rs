//! `PostgreSQL` repository implementation for client task storage.

use super::{
    models::{ClientTaskRow, NewClientTaskRow},
    schema::client_tasks,
};
use crate::assignment::domain::ClientLoanTypeId;
use crate::catalog::domain::{TaskPriority, TemplateId};
use crate::worklist::{
    domain::{ClientTask, ClientTaskId, ClientTaskStatus, PersistedClientTaskData, TaskSnapshot},
    ports::{ClientTaskRepository, ClientTaskRepositoryError, ClientTaskRepositoryResult},
};
use crate::workspace::domain::{Role, UserId, WorkspaceId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by worklist adapters.
pub type WorklistPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed client task repository.
#[derive(Debug, Clone)]
pub struct PostgresClientTaskRepository {
    pool: WorklistPgPool,
}

/// Transaction-scoped error carrier satisfying Diesel's `From<Error>` bound.
enum TxError {
    Repo(ClientTaskRepositoryError),
    Diesel(DieselError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<ClientTaskRepositoryError> for TxError {
    fn from(err: ClientTaskRepositoryError) -> Self {
        Self::Repo(err)
    }
}

impl From<TxError> for ClientTaskRepositoryError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Repo(repo_err) => repo_err,
            TxError::Diesel(diesel_err) => Self::persistence(diesel_err),
        }
    }
}

impl PostgresClientTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorklistPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ClientTaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ClientTaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ClientTaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ClientTaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl ClientTaskRepository for PostgresClientTaskRepository {
    async fn store_batch(&self, tasks: &[ClientTask]) -> ClientTaskRepositoryResult<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let new_rows: Vec<NewClientTaskRow> = tasks.iter().map(to_row).collect();
        let first_id = tasks.iter().map(ClientTask::id).next();

        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<_, TxError, _>(|tx| {
                diesel::insert_into(client_tasks::table)
                    .values(&new_rows)
                    .execute(tx)
                    .map_err(|err| match (err, first_id) {
                        (
                            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _),
                            Some(task_id),
                        ) => TxError::Repo(ClientTaskRepositoryError::DuplicateTask(task_id)),
                        (other, _) => TxError::Diesel(other),
                    })?;
                Ok(())
            });
            outcome.map_err(ClientTaskRepositoryError::from)
        })
        .await
    }

    async fn update(&self, task: &ClientTask) -> ClientTaskRepositoryResult<()> {
        let changeset = to_row(task);
        let task_id = task.id();

        self.run_blocking(move |connection| {
            let updated = diesel::update(client_tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(ClientTaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(ClientTaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ClientTaskId) -> ClientTaskRepositoryResult<Option<ClientTask>> {
        self.run_blocking(move |connection| {
            let row = client_tasks::table
                .find(id.into_inner())
                .select(ClientTaskRow::as_select())
                .first::<ClientTaskRow>(connection)
                .optional()
                .map_err(ClientTaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_client_loan_type(
        &self,
        client_loan_type_id: ClientLoanTypeId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        self.run_blocking(move |connection| {
            let rows = client_tasks::table
                .filter(
                    client_tasks::client_loan_type_id.eq(client_loan_type_id.into_inner()),
                )
                .select(ClientTaskRow::as_select())
                .load::<ClientTaskRow>(connection)
                .map_err(ClientTaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        self.run_blocking(move |connection| {
            let rows = client_tasks::table
                .filter(client_tasks::workspace_id.eq(workspace_id.into_inner()))
                .select(ClientTaskRow::as_select())
                .load::<ClientTaskRow>(connection)
                .map_err(ClientTaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_status(
        &self,
        workspace_id: WorkspaceId,
        status: ClientTaskStatus,
    ) -> ClientTaskRepositoryResult<Vec<ClientTask>> {
        self.run_blocking(move |connection| {
            let rows = client_tasks::table
                .filter(client_tasks::workspace_id.eq(workspace_id.into_inner()))
                .filter(client_tasks::status.eq(status.as_str()))
                .select(ClientTaskRow::as_select())
                .load::<ClientTaskRow>(connection)
                .map_err(ClientTaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &ClientTask) -> NewClientTaskRow {
    let snapshot = task.snapshot();
    NewClientTaskRow {
        id: task.id().into_inner(),
        workspace_id: task.workspace_id().into_inner(),
        client_loan_type_id: task.client_loan_type_id().into_inner(),
        template_id: snapshot.template_id.into_inner(),
        title: snapshot.title.clone(),
        instructions: snapshot.instructions.clone(),
        assignee_role: snapshot.assignee_role.as_str().to_owned(),
        is_required: snapshot.is_required,
        due_in_days: i32::try_from(snapshot.due_in_days).unwrap_or(i32::MAX),
        document_proof_required: snapshot.document_proof_required,
        priority: snapshot.priority.as_str().to_owned(),
        task_order: snapshot.order,
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        completed_at: task.completed_at(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        client_notes: task.client_notes().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: ClientTaskRow) -> ClientTaskRepositoryResult<ClientTask> {
    let ClientTaskRow {
        id,
        workspace_id,
        client_loan_type_id,
        template_id,
        title,
        instructions,
        assignee_role: persisted_role,
        is_required,
        due_in_days: persisted_due_in_days,
        document_proof_required,
        priority: persisted_priority,
        task_order,
        due_date,
        status: persisted_status,
        completed_at,
        assigned_to,
        client_notes,
        created_at,
        updated_at,
    } = row;

    let assignee_role =
        Role::try_from(persisted_role.as_str()).map_err(ClientTaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(ClientTaskRepositoryError::persistence)?;
    let status = ClientTaskStatus::try_from(persisted_status.as_str())
        .map_err(ClientTaskRepositoryError::persistence)?;
    let due_in_days =
        u32::try_from(persisted_due_in_days).map_err(ClientTaskRepositoryError::persistence)?;

    Ok(ClientTask::from_persisted(PersistedClientTaskData {
        id: ClientTaskId::from_uuid(id),
        workspace_id: WorkspaceId::from_uuid(workspace_id),
        client_loan_type_id: ClientLoanTypeId::from_uuid(client_loan_type_id),
        snapshot: TaskSnapshot {
            template_id: TemplateId::from_uuid(template_id),
            title,
            instructions,
            assignee_role,
            is_required,
            due_in_days,
            document_proof_required,
            priority,
            order: task_order,
        },
        due_date,
        status,
        completed_at,
        assigned_to: assigned_to.map(UserId::from_uuid),
        client_notes,
        created_at,
        updated_at,
    }))
}
