//! Adapter implementations for client task persistence.

pub mod memory;
pub mod postgres;
