//! Adapter implementations for assignment persistence.

pub mod memory;
pub mod postgres;
