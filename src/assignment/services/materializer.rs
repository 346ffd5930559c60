//! Template-to-task materialization.

use crate::assignment::domain::{ClientLoanType, default_origination_sequence};
use crate::catalog::ports::{CatalogRepository, CatalogRepositoryError};
use crate::worklist::domain::{ClientTask, TaskSnapshot};
use crate::worklist::ports::{ClientTaskRepository, ClientTaskRepositoryError};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned while materializing tasks for an assignment.
#[derive(Debug, Error)]
pub enum MaterializationError {
    /// Template resolution failed.
    #[error(transparent)]
    Catalog(#[from] CatalogRepositoryError),

    /// Task persistence failed.
    #[error(transparent)]
    Tasks(#[from] ClientTaskRepositoryError),
}

/// Materializes loan type templates into immutable client task snapshots.
///
/// Materialization is idempotent per assignment: templates whose snapshots
/// already exist for the assignment are skipped, so re-invocation after a
/// partial failure only fills the gap.
#[derive(Clone)]
pub struct TaskMaterializer<R, T, C>
where
    R: CatalogRepository,
    T: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    catalog: Arc<R>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> TaskMaterializer<R, T, C>
where
    R: CatalogRepository,
    T: ClientTaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task materializer.
    #[must_use]
    pub const fn new(catalog: Arc<R>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            catalog,
            tasks,
            clock,
        }
    }

    /// Materializes the task worklist for an assignment.
    ///
    /// Templates associated with the loan type are resolved in ascending
    /// `order`; when none exist the fixed default origination sequence is
    /// used instead. Each snapshot's due date is the assignment instant plus
    /// the template's due offset in calendar days. The batch persists
    /// all-or-nothing. Returns only the freshly created tasks.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializationError`] when template resolution or batch
    /// persistence fails.
    pub async fn materialize_for_assignment(
        &self,
        assignment: &ClientLoanType,
    ) -> Result<Vec<ClientTask>, MaterializationError> {
        let mut templates = self
            .catalog
            .templates_for_loan_type(assignment.loan_type_id())
            .await?;
        templates.sort_by(|a, b| {
            a.order()
                .cmp(&b.order())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });

        let snapshots: Vec<TaskSnapshot> = if templates.is_empty() {
            default_origination_sequence()
        } else {
            templates.iter().map(TaskSnapshot::from_template).collect()
        };

        let existing: HashSet<_> = self
            .tasks
            .list_by_client_loan_type(assignment.id())
            .await
            .map_err(MaterializationError::Tasks)?
            .iter()
            .map(|task| task.snapshot().template_id)
            .collect();

        let fresh: Vec<ClientTask> = snapshots
            .into_iter()
            .filter(|snapshot| !existing.contains(&snapshot.template_id))
            .map(|snapshot| {
                ClientTask::materialize(
                    assignment.workspace_id(),
                    assignment.id(),
                    snapshot,
                    assignment.assigned_at(),
                    &*self.clock,
                )
            })
            .collect();

        if !fresh.is_empty() {
            self.tasks.store_batch(&fresh).await?;
        }
        debug!(
            assignment = %assignment.id(),
            created = fresh.len(),
            skipped = existing.len(),
            "task worklist materialized"
        );
        Ok(fresh)
    }
}
