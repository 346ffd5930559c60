//! Client assignment and task materialization.
//!
//! Assigning a loan type to a client produces a [`domain::ClientLoanType`]
//! record and, inline within the same operation, materializes the loan
//! type's associated task templates into immutable per-client task
//! snapshots. At most one active assignment exists per (client, loan type)
//! pair; repeat calls return the existing record instead of duplicating it.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
