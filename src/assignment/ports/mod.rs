//! Port contracts for assignment persistence.

mod repository;

pub use repository::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult};
