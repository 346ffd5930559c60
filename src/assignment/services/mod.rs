//! Orchestration services for assignment and materialization.

mod assign;
mod materializer;

pub use assign::{
    AssignLoanTypeRequest, AssignmentError, AssignmentOutcome, AssignmentResult, AssignmentService,
};
pub use materializer::{MaterializationError, TaskMaterializer};
