//! Materialized client task snapshots and their lifecycle.
//!
//! A client task is an immutable copy of a task template taken at
//! materialization time: later edits or deletion of the source template
//! never alter it. Only lifecycle state (status, completion, assignee,
//! client notes) mutates after creation, governed by a validated state
//! machine. Overdue is a derived property computed on read, never a
//! persisted state. The module follows hexagonal architecture:
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
