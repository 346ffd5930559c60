//! Tenant boundary primitives shared by every bounded context.
//!
//! A workspace is the unit of tenancy: every definition, assignment, and
//! materialized task is scoped to exactly one workspace. This module owns
//! the workspace-level scalar identifiers, the closed [`domain::Role`]
//! enumeration, and the [`ports::MembershipDirectory`] port through which
//! the core consults the external membership service for role lookups.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
