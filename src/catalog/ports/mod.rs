//! Port contracts for catalog persistence.

mod repository;

pub use repository::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult};
