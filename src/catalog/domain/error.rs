//! Error types for catalog domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or updating catalog definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The loan type name is empty after trimming.
    #[error("loan type name must not be empty")]
    EmptyLoanTypeName,

    /// The loan type stage list is empty.
    #[error("loan type requires at least one workflow stage")]
    EmptyStageList,

    /// A stage label is empty after trimming.
    #[error("workflow stage labels must not be empty")]
    EmptyStageLabel,

    /// The loan amount bounds are inverted or negative.
    #[error("invalid loan amount range: min {min_minor} must not exceed max {max_minor}")]
    InvalidAmountRange {
        /// Lower bound in minor currency units.
        min_minor: i64,
        /// Upper bound in minor currency units.
        max_minor: i64,
    },

    /// The interest rate bounds are inverted.
    #[error("invalid interest rate range: min {min_bps}bps must not exceed max {max_bps}bps")]
    InvalidRateRange {
        /// Lower bound in basis points.
        min_bps: u32,
        /// Upper bound in basis points.
        max_bps: u32,
    },

    /// The template title is empty after trimming.
    #[error("task template title must not be empty")]
    EmptyTemplateTitle,

    /// The due offset exceeds the supported maximum.
    #[error("due offset of {0} days exceeds the supported maximum")]
    DueOffsetTooLarge(u32),
}

/// Error returned while parsing loan type statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown loan type status: {0}")]
pub struct ParseLoanTypeStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
