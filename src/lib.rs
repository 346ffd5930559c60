//! Originate: loan-origination workflow materialization core.
//!
//! This crate turns reusable loan type and task template definitions into
//! concrete, per-client work items with computed due dates, role assignment,
//! and a validated lifecycle state machine.
//!
//! # Architecture
//!
//! Originate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`workspace`]: Tenant boundary scalars, roles, and the membership port
//! - [`catalog`]: Loan type and task template definitions and associations
//! - [`assignment`]: Client assignment and task materialization
//! - [`worklist`]: Materialized client task snapshots and their lifecycle

pub mod assignment;
pub mod catalog;
pub mod worklist;
pub mod workspace;
