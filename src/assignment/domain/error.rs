//! Error types for assignment domain validation.

use super::ClientLoanTypeId;
use thiserror::Error;

/// Errors returned while mutating assignment aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentDomainError {
    /// The assignment has already been deactivated.
    #[error("assignment already inactive: {0}")]
    AlreadyInactive(ClientLoanTypeId),
}
