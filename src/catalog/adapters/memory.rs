//! In-memory catalog repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{LoanType, LoanTypeId, TaskTemplate, TemplateId},
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use crate::workspace::domain::WorkspaceId;

/// Thread-safe in-memory catalog repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    loan_types: HashMap<LoanTypeId, LoanType>,
    templates: HashMap<TemplateId, TaskTemplate>,
    title_index: HashMap<(WorkspaceId, String), TemplateId>,
    template_to_loan_types: HashMap<TemplateId, Vec<LoanTypeId>>,
    loan_type_to_templates: HashMap<LoanTypeId, Vec<TemplateId>>,
}

impl InMemoryCatalogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> CatalogRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryCatalogState>> {
        self.state.read().map_err(|err| {
            CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> CatalogRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryCatalogState>> {
        self.state.write().map_err(|err| {
            CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn title_key(template: &TaskTemplate) -> (WorkspaceId, String) {
    (template.workspace_id(), template.title().normalized())
}

/// Removes one association edge from an id-keyed index, dropping the entry
/// when it becomes empty.
fn remove_edge<K: std::hash::Hash + Eq, V: PartialEq>(
    index: &mut HashMap<K, Vec<V>>,
    key: &K,
    value: &V,
) {
    if let Some(edges) = index.get_mut(key) {
        edges.retain(|edge| edge != value);
        if edges.is_empty() {
            index.remove(key);
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn store_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.loan_types.contains_key(&loan_type.id()) {
            return Err(CatalogRepositoryError::DuplicateLoanType(loan_type.id()));
        }
        state.loan_types.insert(loan_type.id(), loan_type.clone());
        Ok(())
    }

    async fn update_loan_type(&self, loan_type: &LoanType) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.loan_types.contains_key(&loan_type.id()) {
            return Err(CatalogRepositoryError::LoanTypeNotFound(loan_type.id()));
        }
        state.loan_types.insert(loan_type.id(), loan_type.clone());
        Ok(())
    }

    async fn delete_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.loan_types.remove(&id).is_none() {
            return Err(CatalogRepositoryError::LoanTypeNotFound(id));
        }
        let template_ids = state.loan_type_to_templates.remove(&id).unwrap_or_default();
        for template_id in template_ids {
            remove_edge(&mut state.template_to_loan_types, &template_id, &id);
        }
        Ok(())
    }

    async fn find_loan_type(&self, id: LoanTypeId) -> CatalogRepositoryResult<Option<LoanType>> {
        let state = self.read_state()?;
        Ok(state.loan_types.get(&id).cloned())
    }

    async fn list_loan_types(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<LoanType>> {
        let state = self.read_state()?;
        Ok(state
            .loan_types
            .values()
            .filter(|loan_type| loan_type.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn store_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.templates.contains_key(&template.id()) {
            return Err(CatalogRepositoryError::DuplicateTemplate(template.id()));
        }
        let key = title_key(template);
        if state.title_index.contains_key(&key) {
            return Err(CatalogRepositoryError::DuplicateTemplateTitle {
                workspace_id: template.workspace_id(),
                title: template.title().as_str().to_owned(),
            });
        }
        state.title_index.insert(key, template.id());
        state.templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn update_template(&self, template: &TaskTemplate) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        let old_template = state
            .templates
            .get(&template.id())
            .ok_or(CatalogRepositoryError::TemplateNotFound(template.id()))?
            .clone();

        let new_key = title_key(template);
        let colliding = state
            .title_index
            .get(&new_key)
            .is_some_and(|owner| *owner != template.id());
        if colliding {
            return Err(CatalogRepositoryError::DuplicateTemplateTitle {
                workspace_id: template.workspace_id(),
                title: template.title().as_str().to_owned(),
            });
        }

        state.title_index.remove(&title_key(&old_template));
        state.title_index.insert(new_key, template.id());
        state.templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn delete_template(&self, id: TemplateId) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        let removed = state
            .templates
            .remove(&id)
            .ok_or(CatalogRepositoryError::TemplateNotFound(id))?;
        state.title_index.remove(&title_key(&removed));
        let loan_type_ids = state.template_to_loan_types.remove(&id).unwrap_or_default();
        for loan_type_id in loan_type_ids {
            remove_edge(&mut state.loan_type_to_templates, &loan_type_id, &id);
        }
        Ok(())
    }

    async fn find_template(&self, id: TemplateId) -> CatalogRepositoryResult<Option<TaskTemplate>> {
        let state = self.read_state()?;
        Ok(state.templates.get(&id).cloned())
    }

    async fn list_templates(
        &self,
        workspace_id: WorkspaceId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>> {
        let state = self.read_state()?;
        Ok(state
            .templates
            .values()
            .filter(|template| template.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn replace_associations(
        &self,
        template_id: TemplateId,
        loan_type_ids: &[LoanTypeId],
    ) -> CatalogRepositoryResult<()> {
        let mut state = self.write_state()?;
        let previous = state
            .template_to_loan_types
            .remove(&template_id)
            .unwrap_or_default();
        for loan_type_id in previous {
            remove_edge(&mut state.loan_type_to_templates, &loan_type_id, &template_id);
        }

        if !loan_type_ids.is_empty() {
            state
                .template_to_loan_types
                .insert(template_id, loan_type_ids.to_vec());
            for loan_type_id in loan_type_ids {
                state
                    .loan_type_to_templates
                    .entry(*loan_type_id)
                    .or_default()
                    .push(template_id);
            }
        }
        Ok(())
    }

    async fn templates_for_loan_type(
        &self,
        loan_type_id: LoanTypeId,
    ) -> CatalogRepositoryResult<Vec<TaskTemplate>> {
        let state = self.read_state()?;
        // Dangling template references are skipped, never surfaced.
        Ok(state
            .loan_type_to_templates
            .get(&loan_type_id)
            .map(|template_ids| {
                template_ids
                    .iter()
                    .filter_map(|template_id| state.templates.get(template_id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn loan_types_for_template(
        &self,
        template_id: TemplateId,
    ) -> CatalogRepositoryResult<Vec<LoanType>> {
        let state = self.read_state()?;
        Ok(state
            .template_to_loan_types
            .get(&template_id)
            .map(|loan_type_ids| {
                loan_type_ids
                    .iter()
                    .filter_map(|loan_type_id| state.loan_types.get(loan_type_id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}
