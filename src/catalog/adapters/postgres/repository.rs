//! `PostgreSQL` repository implementation for catalog storage.

use super::{
    models::{LoanTypeRow, NewAssociationRow, NewLoanTypeRow, NewTaskTemplateRow, TaskTemplateRow},
    schema::{loan_types, task_templates, template_associations},
};
use crate::catalog::{
    domain::{
        AmountRange, LoanType, LoanTypeId, LoanTypeStatus, PersistedLoanTypeData,
        PersistedTaskTemplateData, RateRange, TaskPriority, TaskTemplate, TemplateId,
        TemplateTitle,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use crate::workspace::domain::{Role, WorkspaceId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by catalog adapters.
pub type CatalogPgPool = Pool<ConnectionManager<PgConnection>>;

/// Constraint backing per-workspace case-folded title uniqueness.
const TITLE_UNIQUE_CONSTRAINT: &str = "idx_task_templates_workspace_title_key_unique";

/// `PostgreSQL`-backed catalog repository.
#[derive(Debug, Clone)]
pub struct PostgresCatalogRepository {
    pool: CatalogPgPool,
}

/// Transaction-scoped error carrier satisfying Diesel's `From<Error>` bound.
enum TxError {
    Repo(CatalogRepositoryError),
    Diesel(DieselError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<CatalogRepositoryError> for TxError {
    fn from(err: CatalogRepositoryError) -> Self {
        Self::Repo(err)
    }
}

impl From<TxError> for CatalogRepositoryError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Repo(repo_err) => repo_err,
            TxError::Diesel(diesel_err) => Self::persistence(diesel_err),
        }
    }
}

impl PostgresCatalogRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CatalogPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CatalogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CatalogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CatalogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CatalogRepositoryError::persistence)?
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn store_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()> {
        let loan_type_id = loan_type.id();
        let new_row = to_loan_type_row(loan_type)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(loan_types::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CatalogRepositoryError::DuplicateLoanType(loan_type_id)
                    }
                    _ => CatalogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()> {
        let loan_type_id = loan_type.id();
        let changeset = to_loan_type_row(loan_type)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(loan_types::table.find(loan_type_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if updated == 0 {
                return Err(CatalogRepositoryError::LoanTypeNotFound(loan_type_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<_, TxError, _>(|tx| {
                diesel::delete(
                    template_associations::table
                        .filter(template_associations::loan_type_id.eq(id.into_inner())),
                )
                .execute(tx)?;

                let deleted = diesel::delete(loan_types::table.find(id.into_inner())).execute(tx)?;
                if deleted == 0 {
                    return Err(CatalogRepositoryError::LoanTypeNotFound(id).into());
                }
                Ok(())
            });
            outcome.map_err(CatalogRepositoryError::from)
        })
        .await
    }

    async fn find_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<Option<LoanType>> {
        self.run_blocking(move |connection| {
            let row = loan_types::table
                .find(id.into_inner())
                .select(LoanTypeRow::as_select())
                .first::<LoanTypeRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_loan_type).transpose()
        })
        .await
    }

    async fn list_loan_types(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<LoanType>> {
        self.run_blocking(move |connection| {
            let rows = loan_types::table
                .filter(loan_types::workspace_id.eq(workspace_id.into_inner()))
                .select(LoanTypeRow::as_select())
                .load::<LoanTypeRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_loan_type).collect()
        })
        .await
    }

    async fn store_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()> {
        let new_row = to_template_row(template);
        let template_id = template.id();
        let workspace_id = template.workspace_id();
        let title = template.title().as_str().to_owned();

        self.run_blocking(move |connection| {
            diesel::insert_into(task_templates::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    map_template_unique_violation(err, template_id, workspace_id, title)
                })?;
            Ok(())
        })
        .await
    }

    async fn update_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()> {
        let changeset = to_template_row(template);
        let template_id = template.id();
        let workspace_id = template.workspace_id();
        let title = template.title().as_str().to_owned();

        self.run_blocking(move |connection| {
            let updated = diesel::update(task_templates::table.find(template_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(|err| {
                    map_template_unique_violation(err, template_id, workspace_id, title)
                })?;
            if updated == 0 {
                return Err(CatalogRepositoryError::TemplateNotFound(template_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_template(&self, id: TemplateId) -> CatalogRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<_, TxError, _>(|tx| {
                diesel::delete(
                    template_associations::table
                        .filter(template_associations::template_id.eq(id.into_inner())),
                )
                .execute(tx)?;

                let deleted =
                    diesel::delete(task_templates::table.find(id.into_inner())).execute(tx)?;
                if deleted == 0 {
                    return Err(CatalogRepositoryError::TemplateNotFound(id).into());
                }
                Ok(())
            });
            outcome.map_err(CatalogRepositoryError::from)
        })
        .await
    }

    async fn find_template(&self, id: TemplateId) -> CatalogRepositoryResult<Option<TaskTemplate>> {
        self.run_blocking(move |connection| {
            let row = task_templates::table
                .find(id.into_inner())
                .select(TaskTemplateRow::as_select())
                .first::<TaskTemplateRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_template).transpose()
        })
        .await
    }

    async fn list_templates(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>> {
        self.run_blocking(move |connection| {
            let rows = task_templates::table
                .filter(task_templates::workspace_id.eq(workspace_id.into_inner()))
                .select(TaskTemplateRow::as_select())
                .load::<TaskTemplateRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_template).collect()
        })
        .await
    }

    async fn replace_associations(
        &self,
        template_id: TemplateId,
        loan_type_ids: &[LoanTypeId],
    ) -> CatalogRepositoryResult<()> {
        let new_rows: Vec<NewAssociationRow> = loan_type_ids
            .iter()
            .map(|loan_type_id| NewAssociationRow {
                template_id: template_id.into_inner(),
                loan_type_id: loan_type_id.into_inner(),
            })
            .collect();

        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<_, TxError, _>(|tx| {
                diesel::delete(
                    template_associations::table.filter(
                        template_associations::template_id.eq(template_id.into_inner()),
                    ),
                )
                .execute(tx)?;

                if !new_rows.is_empty() {
                    diesel::insert_into(template_associations::table)
                        .values(&new_rows)
                        .execute(tx)?;
                }
                Ok(())
            });
            outcome.map_err(CatalogRepositoryError::from)
        })
        .await
    }

    async fn templates_for_loan_type(
        &self,
        loan_type_id: LoanTypeId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>> {
        self.run_blocking(move |connection| {
            let template_ids: Vec<uuid::Uuid> = template_associations::table
                .filter(template_associations::loan_type_id.eq(loan_type_id.into_inner()))
                .select(template_associations::template_id)
                .load(connection)
                .map_err(CatalogRepositoryError::persistence)?;

            // eq_any silently skips rows whose target was deleted.
            let rows = task_templates::table
                .filter(task_templates::id.eq_any(template_ids))
                .select(TaskTemplateRow::as_select())
                .load::<TaskTemplateRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_template).collect()
        })
        .await
    }

    async fn loan_types_for_template(
        &self,
        template_id: TemplateId,
    ) -> CatalogRepositoryResult<Vec<LoanType>> {
        self.run_blocking(move |connection| {
            let loan_type_ids: Vec<uuid::Uuid> = template_associations::table
                .filter(template_associations::template_id.eq(template_id.into_inner()))
                .select(template_associations::loan_type_id)
                .load(connection)
                .map_err(CatalogRepositoryError::persistence)?;

            let rows = loan_types::table
                .filter(loan_types::id.eq_any(loan_type_ids))
                .select(LoanTypeRow::as_select())
                .load::<LoanTypeRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_loan_type).collect()
        })
        .await
    }
}

fn map_template_unique_violation(
    err: DieselError,
    template_id: TemplateId,
    workspace_id: WorkspaceId,
    title: String,
) -> CatalogRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(TITLE_UNIQUE_CONSTRAINT) =>
        {
            CatalogRepositoryError::DuplicateTemplateTitle {
                workspace_id,
                title,
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CatalogRepositoryError::DuplicateTemplate(template_id)
        }
        _ => CatalogRepositoryError::persistence(err),
    }
}

fn to_loan_type_row(loan_type: &LoanType) -> CatalogRepositoryResult<NewLoanTypeRow> {
    let stages =
        serde_json::to_value(loan_type.stages()).map_err(CatalogRepositoryError::persistence)?;
    let amount_range = loan_type
        .amount_range()
        .map(|range| serde_json::to_value(range))
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;
    let rate_range = loan_type
        .rate_range()
        .map(|range| serde_json::to_value(range))
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;

    Ok(NewLoanTypeRow {
        id: loan_type.id().into_inner(),
        workspace_id: loan_type.workspace_id().into_inner(),
        name: loan_type.name().to_owned(),
        description: loan_type.description().map(str::to_owned),
        category: loan_type.category().map(str::to_owned),
        stages,
        status: loan_type.status().as_str().to_owned(),
        amount_range,
        rate_range,
        created_at: loan_type.created_at(),
        updated_at: loan_type.updated_at(),
    })
}

fn row_to_loan_type(row: LoanTypeRow) -> CatalogRepositoryResult<LoanType> {
    let LoanTypeRow {
        id,
        workspace_id,
        name,
        description,
        category,
        stages: persisted_stages,
        status: persisted_status,
        amount_range: persisted_amount_range,
        rate_range: persisted_rate_range,
        created_at,
        updated_at,
    } = row;

    let stages = serde_json::from_value::<Vec<String>>(persisted_stages)
        .map_err(CatalogRepositoryError::persistence)?;
    let status = LoanTypeStatus::try_from(persisted_status.as_str())
        .map_err(CatalogRepositoryError::persistence)?;
    let amount_range = persisted_amount_range
        .map(serde_json::from_value::<AmountRange>)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;
    let rate_range = persisted_rate_range
        .map(serde_json::from_value::<RateRange>)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;

    Ok(LoanType::from_persisted(PersistedLoanTypeData {
        id: LoanTypeId::from_uuid(id),
        workspace_id: WorkspaceId::from_uuid(workspace_id),
        name,
        description,
        category,
        stages,
        status,
        amount_range,
        rate_range,
        created_at,
        updated_at,
    }))
}

fn to_template_row(template: &TaskTemplate) -> NewTaskTemplateRow {
    NewTaskTemplateRow {
        id: template.id().into_inner(),
        workspace_id: template.workspace_id().into_inner(),
        title: template.title().as_str().to_owned(),
        title_key: template.title().normalized(),
        assignee_role: template.assignee_role().as_str().to_owned(),
        instructions: template.instructions().to_owned(),
        is_required: template.is_required(),
        due_in_days: i32::try_from(template.due_in_days()).unwrap_or(i32::MAX),
        document_proof_required: template.document_proof_required(),
        priority: template.priority().as_str().to_owned(),
        task_order: template.order(),
        created_at: template.created_at(),
        updated_at: template.updated_at(),
    }
}

fn row_to_template(row: TaskTemplateRow) -> CatalogRepositoryResult<TaskTemplate> {
    let TaskTemplateRow {
        id,
        workspace_id,
        title: persisted_title,
        assignee_role: persisted_role,
        instructions,
        is_required,
        due_in_days: persisted_due_in_days,
        document_proof_required,
        priority: persisted_priority,
        task_order,
        created_at,
        updated_at,
        ..
    } = row;

    let title = TemplateTitle::new(persisted_title).map_err(CatalogRepositoryError::persistence)?;
    let assignee_role =
        Role::try_from(persisted_role.as_str()).map_err(CatalogRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(CatalogRepositoryError::persistence)?;
    let due_in_days =
        u32::try_from(persisted_due_in_days).map_err(CatalogRepositoryError::persistence)?;

    Ok(TaskTemplate::from_persisted(PersistedTaskTemplateData {
        id: TemplateId::from_uuid(id),
        workspace_id: WorkspaceId::from_uuid(workspace_id),
        title,
        assignee_role,
        instructions,
        is_required,
        due_in_days,
        document_proof_required,
        priority,
        order: task_order,
        created_at,
        updated_at,
    }))
}
