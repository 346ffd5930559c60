//! Adapter implementations for workspace membership lookups.

pub mod memory;
