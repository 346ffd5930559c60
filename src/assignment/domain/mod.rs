//! Domain model for client loan type assignments.

mod client_loan_type;
mod defaults;
mod error;
mod ids;

pub use client_loan_type::{ClientLoanType, NewClientLoanType, PersistedClientLoanTypeData};
pub use defaults::default_origination_sequence;
pub use error::AssignmentDomainError;
pub use ids::ClientLoanTypeId;
