//! Port contracts for client task persistence.

mod repository;

pub use repository::{ClientTaskRepository, ClientTaskRepositoryError, ClientTaskRepositoryResult};
