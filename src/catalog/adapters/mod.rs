//! Adapter implementations for catalog persistence.

pub mod memory;
pub mod postgres;
