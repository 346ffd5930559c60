//! Domain model for workflow definitions.
//!
//! Loan types and task templates are workspace-scoped aggregates validated
//! at construction time; infrastructure concerns stay outside the domain
//! boundary.

mod error;
mod ids;
mod loan_type;
mod task_template;

pub use error::{CatalogDomainError, ParseLoanTypeStatusError, ParseTaskPriorityError};
pub use ids::{LoanTypeId, TemplateId};
pub use loan_type::{
    AmountRange, LoanType, LoanTypeStatus, LoanTypeUpdate, NewLoanType, PersistedLoanTypeData,
    RateRange,
};
pub use task_template::{
    NewTaskTemplate, PersistedTaskTemplateData, TaskPriority, TaskTemplate, TemplateTitle,
    TemplateUpdate,
};
