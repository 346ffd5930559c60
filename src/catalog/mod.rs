//! Loan type and task template definitions for a workspace.
//!
//! The catalog owns the reusable workflow building blocks: loan types with
//! their display stages, task templates with their assignee roles and due
//! offsets, and the many-to-many association deciding which templates apply
//! to which loan types. Association resolution is tolerant of dangling
//! references so that deleting a definition never breaks a read. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
