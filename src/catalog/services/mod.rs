//! Application services for catalog definitions and associations.

mod associations;
mod definitions;

pub use associations::AssociationResolver;
pub use definitions::{
    CatalogServiceError, CatalogServiceResult, CreateLoanTypeRequest, CreateTaskTemplateRequest,
    DefinitionService, UpdateLoanTypeRequest, UpdateTaskTemplateRequest,
};
